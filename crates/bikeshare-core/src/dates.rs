use chrono::NaiveDate;

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Date-only layouts accepted for the `dteday` column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Date-time layouts whose time component is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a calendar date from a dataset cell.
///
/// Accepts plain dates (`2011-01-01`, `2011/01/01`) and date-times, in which
/// case only the date part is kept. Returns `None` for empty or unrecognised
/// input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// `clap` value parser for `--start` / `--end`.
pub fn parse_cli_date(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("expected a date like 2011-01-31, got '{}'", raw))
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

/// Whole days from `earlier` to `later`; negative when `later` precedes `earlier`.
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Shift `date` by `days`, saturating at chrono's representable limits.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let delta = chrono::Duration::days(days);
    date.checked_add_signed(delta).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Canonical `YYYY-MM-DD` rendering used across the UI.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
