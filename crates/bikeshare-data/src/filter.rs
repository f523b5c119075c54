//! Inclusive date-range selection over a loaded table.

use bikeshare_core::models::{DateRange, Table};

/// Rows whose `dteday` lies in `[range.start, range.end]`, in source order.
///
/// The source table is left untouched and the result is a fresh table. An
/// inverted range is not an error; it simply matches nothing.
pub fn filter_range(table: &Table, range: &DateRange) -> Table {
    let records = table
        .iter()
        .filter(|r| range.contains(r.dteday))
        .cloned()
        .collect();
    table.derive(records)
}
