//! Shared, read-only access to the loaded dataset.
//!
//! The table is loaded once at startup and wrapped in an [`Arc`] so the UI
//! thread and the background orchestrator can both read it. Every call to
//! [`DatasetHandle::analyze`] runs a fresh aggregation pass.

use std::path::Path;
use std::sync::Arc;

use bikeshare_core::error::Result;
use bikeshare_core::models::{DateRange, Table};
use bikeshare_data::analysis::{analyze_range, DashboardSnapshot};
use bikeshare_data::reader::load_table;

// ── DatasetHandle ─────────────────────────────────────────────────────────────

/// Cheaply clonable handle to the immutable source table.
///
/// # Example
/// ```no_run
/// use bikeshare_runtime::data_manager::DatasetHandle;
///
/// let data = DatasetHandle::load("all_data.csv".as_ref())?;
/// if let Some(range) = data.default_range() {
///     let snapshot = data.analyze(range, 5);
///     println!("total sharing: {}", snapshot.summary.total_sharing);
/// }
/// # Ok::<(), bikeshare_core::DashboardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    table: Arc<Table>,
    bounds: Option<DateRange>,
}

impl DatasetHandle {
    /// Load the CSV at `path`. Errors are fatal for the caller.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_table(load_table(path)?))
    }

    /// Wrap an already loaded table.
    pub fn from_table(table: Table) -> Self {
        let bounds = table.date_bounds();
        Self {
            table: Arc::new(table),
            bounds,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Earliest and latest `dteday`; `None` for an empty dataset.
    pub fn bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    /// The range the date control starts with: the full dataset span.
    pub fn default_range(&self) -> Option<DateRange> {
        self.bounds
    }

    pub fn record_count(&self) -> usize {
        self.table.len()
    }

    // ── Analysis ──────────────────────────────────────────────────────────

    /// Filter, aggregate and summarize `range` from scratch.
    pub fn analyze(&self, range: DateRange, top_n: usize) -> DashboardSnapshot {
        analyze_range(&self.table, range, top_n)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
