//! Filter → aggregate pipeline run once per range change.
//!
//! [`analyze_range`] is the single entry point the runtime calls; it returns a
//! self-contained [`DashboardSnapshot`] the UI can render without touching the
//! source table again.

use bikeshare_core::models::{CategoryCount, DailySharing, DateRange, RfmRow, Table};

use crate::aggregator::SharingAggregator;
use crate::filter::filter_range;

/// Default length of the RFM rankings.
pub const DEFAULT_TOP_N: usize = 5;

// ── Public types ──────────────────────────────────────────────────────────────

/// Headline metrics shown above the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct SharingSummary {
    /// Sum of daily totals.
    pub total_sharing: u64,
    /// Mean recency in days; `None` when the range holds no entities.
    pub average_recency: Option<f64>,
    /// Mean monetary value; `None` when the range holds no entities.
    pub average_monetary: Option<f64>,
}

/// Everything the presentation layer needs for one date range.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// The range this snapshot was computed for.
    pub range: DateRange,
    /// Number of records that passed the filter.
    pub records_in_range: usize,
    pub daily: Vec<DailySharing>,
    pub categories: Vec<CategoryCount>,
    pub rfm: Vec<RfmRow>,
    pub summary: SharingSummary,
    /// Most recently active entities, best first.
    pub top_recency: Vec<RfmRow>,
    /// Highest monetary entities, best first.
    pub top_monetary: Vec<RfmRow>,
    /// Wall-clock seconds spent filtering and aggregating.
    pub compute_time_seconds: f64,
}

impl DashboardSnapshot {
    /// `true` when the filter matched nothing.
    pub fn is_empty(&self) -> bool {
        self.records_in_range == 0
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline for `range`.
///
/// 1. Filter `table` to the inclusive range.
/// 2. Run the daily, category and RFM aggregators on the filtered rows.
/// 3. Derive the headline metrics and the two RFM rankings.
pub fn analyze_range(table: &Table, range: DateRange, top_n: usize) -> DashboardSnapshot {
    let started = std::time::Instant::now();

    let filtered = filter_range(table, &range);

    let daily = SharingAggregator::aggregate_daily(&filtered);
    let categories = SharingAggregator::aggregate_by_category(&filtered);
    let rfm = SharingAggregator::aggregate_rfm(&filtered);

    let summary = SharingSummary {
        total_sharing: SharingAggregator::total_sharing(&daily),
        average_recency: SharingAggregator::average_recency(&rfm),
        average_monetary: SharingAggregator::average_monetary(&rfm),
    };

    let top_recency = SharingAggregator::top_by_recency(&rfm, top_n);
    let top_monetary = SharingAggregator::top_by_monetary(&rfm, top_n);

    let compute_time_seconds = started.elapsed().as_secs_f64();

    tracing::debug!(
        range = %range,
        records = filtered.len(),
        days = daily.len(),
        categories = categories.len(),
        entities = rfm.len(),
        compute_time_seconds,
        "dashboard snapshot computed"
    );

    DashboardSnapshot {
        range,
        records_in_range: filtered.len(),
        daily,
        categories,
        rfm,
        summary,
        top_recency,
        top_monetary,
        compute_time_seconds,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
