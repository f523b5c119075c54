//! CSV loading for the bike sharing dataset.
//!
//! Reads the delimited input file once at startup into an immutable
//! [`Table`], sorted by `dteday`. Loading is fail-fast: the first bad row
//! aborts the whole load.

use std::io::Read;
use std::path::Path;

use bikeshare_core::dates::parse_date;
use bikeshare_core::error::{DashboardError, Result};
use bikeshare_core::models::{Key, Record, Table};
use tracing::{debug, info};

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["instant", "dteday", "holiday", "cnt"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the dataset at `path`.
///
/// Fails with [`DashboardError::SourceUnavailable`] when the file cannot be
/// opened, [`DashboardError::MissingColumn`] when a required header is absent
/// and [`DashboardError::Parse`] on the first malformed row.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_table(file)?;

    match table.date_bounds() {
        Some(bounds) => info!(
            "Loaded {} records from {} ({})",
            table.len(),
            path.display(),
            bounds
        ),
        None => info!("Loaded empty dataset from {}", path.display()),
    }

    Ok(table)
}

/// Parse CSV from any byte source. The first line must be a header row.
pub fn read_table<R: Read>(source: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut records: Vec<Record> = Vec::new();
    for row in reader.records() {
        let row = row.map_err(row_error)?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(layout.parse_record(&row, line)?);
    }

    // Stable, so rows sharing a date keep file order.
    records.sort_by_key(|r| r.dteday);

    debug!(
        "Parsed {} rows ({} pass-through columns)",
        records.len(),
        layout.extra.len()
    );

    Ok(Table::new(layout.extra_names(), records))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Header positions resolved once per file.
struct ColumnLayout {
    instant: usize,
    dteday: usize,
    holiday: usize,
    cnt: usize,
    /// `(position, name)` of every column the core does not interpret.
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
        };

        let instant = find("instant")?;
        let dteday = find("dteday")?;
        let holiday = find("holiday")?;
        let cnt = find("cnt")?;

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| ![instant, dteday, holiday, cnt].contains(i))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        Ok(Self {
            instant,
            dteday,
            holiday,
            cnt,
            extra,
        })
    }

    fn extra_names(&self) -> Vec<String> {
        self.extra.iter().map(|(_, name)| name.clone()).collect()
    }

    fn parse_record(&self, row: &csv::StringRecord, line: u64) -> Result<Record> {
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let instant = parse_key(field(self.instant), "instant", line)?;
        let holiday = parse_key(field(self.holiday), "holiday", line)?;

        let raw_date = field(self.dteday);
        let dteday = parse_date(raw_date).ok_or_else(|| DashboardError::Parse {
            line,
            column: "dteday".to_string(),
            message: format!("unrecognised date '{}'", raw_date),
        })?;

        let raw_cnt = field(self.cnt);
        let cnt = raw_cnt.parse::<u64>().map_err(|_| DashboardError::Parse {
            line,
            column: "cnt".to_string(),
            message: format!("expected a non-negative integer, got '{}'", raw_cnt),
        })?;

        let extra = self
            .extra
            .iter()
            .map(|(idx, _)| field(*idx).to_string())
            .collect();

        Ok(Record {
            instant,
            dteday,
            holiday,
            cnt,
            extra,
        })
    }
}

fn parse_key(raw: &str, column: &str, line: u64) -> Result<Key> {
    if raw.is_empty() {
        return Err(DashboardError::Parse {
            line,
            column: column.to_string(),
            message: "empty value".to_string(),
        });
    }
    Ok(Key::parse(raw))
}

/// Row-level CSV failures (ragged rows, bad UTF-8) count as malformed rows.
fn row_error(err: csv::Error) -> DashboardError {
    let line = err.position().map(|p| p.line()).unwrap_or_default();
    DashboardError::Parse {
        line,
        column: "*".to_string(),
        message: err.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
