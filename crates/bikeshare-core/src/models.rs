use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates;
use crate::error::{DashboardError, Result};

// ── Keys ──────────────────────────────────────────────────────────────────────

/// Identifier-like cell value that may be numeric or free text.
///
/// Integers order numerically and always sort before text keys, so `2` comes
/// before `10` and both come before `"a"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    /// Interpret a raw cell: integers when they parse, trimmed text otherwise.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Key::Int(n),
            Err(_) => Key::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

/// Renter / session identifier (`instant` column).
pub type EntityId = Key;

/// Day classification (`holiday` column).
pub type CategoryKey = Key;

// ── Record / Table ────────────────────────────────────────────────────────────

/// One row of the raw bike sharing dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Entity identifier; repeated across rows belonging to the same entity.
    pub instant: EntityId,
    /// Calendar day of the activity.
    pub dteday: NaiveDate,
    /// Category key used by the category aggregator.
    pub holiday: CategoryKey,
    /// Units rented on this row.
    pub cnt: u64,
    /// Unused columns, positionally aligned with [`Table::extra_columns`].
    pub extra: Vec<String>,
}

impl Record {
    /// Build a record with no pass-through columns.
    pub fn new(instant: EntityId, dteday: NaiveDate, holiday: CategoryKey, cnt: u64) -> Self {
        Self {
            instant,
            dteday,
            holiday,
            cnt,
            extra: Vec::new(),
        }
    }
}

/// Immutable in-memory record set.
///
/// Tables produced by the loader are sorted by `dteday`; tables produced by the
/// range filter keep the order of their source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    extra_columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// Wrap `records`, whose `extra` values follow `extra_columns`.
    pub fn new(extra_columns: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            extra_columns,
            records,
        }
    }

    /// Table without pass-through columns.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::new(Vec::new(), records)
    }

    /// New table sharing this table's column layout but holding `records`.
    pub fn derive(&self, records: Vec<Record>) -> Self {
        Self::new(self.extra_columns.clone(), records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Value of a pass-through column for `record`, if the column exists.
    pub fn extra_value<'a>(&self, record: &'a Record, column: &str) -> Option<&'a str> {
        let idx = self.extra_columns.iter().position(|c| c == column)?;
        record.extra.get(idx).map(String::as_str)
    }

    /// Sum of `cnt` over every row, saturating at `u64::MAX`.
    pub fn total_cnt(&self) -> u64 {
        self.records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.cnt))
    }

    /// Earliest and latest `dteday`, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let start = self.records.iter().map(|r| r.dteday).min()?;
        let end = self.records.iter().map(|r| r.dteday).max()?;
        Some(DateRange::new(start, end))
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ── DateRange ─────────────────────────────────────────────────────────────────

/// Inclusive `[start, end]` date window chosen by the user.
///
/// An inverted range (`start > end`) is representable on purpose: it simply
/// selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering exactly one day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar days covered; zero when inverted.
    pub fn num_days(&self) -> i64 {
        if self.is_inverted() {
            0
        } else {
            dates::days_between(self.end, self.start) + 1
        }
    }

    /// Reject inverted ranges with [`DashboardError::InvalidRange`].
    pub fn validate(&self) -> Result<()> {
        if self.is_inverted() {
            return Err(DashboardError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Pull both ends inside `bounds` without reordering them.
    pub fn clamp_to(&self, bounds: &DateRange) -> Self {
        let clamp = |d: NaiveDate| d.max(bounds.start).min(bounds.end);
        Self::new(clamp(self.start), clamp(self.end))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            dates::format_date(self.start),
            dates::format_date(self.end)
        )
    }
}

// ── Derived rows ──────────────────────────────────────────────────────────────

/// Total rentals on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySharing {
    pub date: NaiveDate,
    pub total_cnt: u64,
}

/// Number of distinct entities seen under one category key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub holiday: CategoryKey,
    pub distinct_instants: usize,
}

/// Recency / monetary profile of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmRow {
    pub instant: EntityId,
    /// Days between the entity's last activity and the window's last activity.
    pub recency_days: i64,
    /// Sum of `cnt` over the entity's rows.
    pub monetary: u64,
}
