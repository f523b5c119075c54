//! Plain-text rendering of a snapshot for `--view summary`.

use std::fmt::Write;

use bikeshare_core::dates::format_date;
use bikeshare_core::formatting::{format_count, format_monetary, format_optional, format_recency};
use bikeshare_core::models::RfmRow;
use bikeshare_data::analysis::DashboardSnapshot;
use unicode_width::UnicodeWidthStr;

use crate::components::header::TITLE;
use crate::components::metrics::summary_cards;
use crate::themes::Theme;

/// Build the report printed to stdout.
pub fn render_summary(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    // `fmt::Write` for `String` never fails.
    let _ = write_summary(&mut out, snapshot);
    out
}

fn write_summary(out: &mut String, snapshot: &DashboardSnapshot) -> std::fmt::Result {
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{}", "=".repeat(UnicodeWidthStr::width(TITLE)))?;
    writeln!(
        out,
        "Range: {} ({} records)",
        snapshot.range,
        format_count(snapshot.records_in_range as u64)
    )?;
    writeln!(out)?;

    if snapshot.is_empty() {
        writeln!(out, "No data in range")?;
        return Ok(());
    }

    // Same captions and formatting as the dashboard cards.
    let theme = Theme::classic();
    let cards = summary_cards(&snapshot.summary, &theme);
    let label_width = cards
        .iter()
        .map(|c| UnicodeWidthStr::width(c.label))
        .max()
        .unwrap_or(0);
    for card in &cards {
        writeln!(out, "{}  {}", pad(card.label, label_width), card.value)?;
    }
    writeln!(out)?;

    writeln!(out, "Daily sharing")?;
    for day in &snapshot.daily {
        writeln!(out, "  {}  {:>10}", format_date(day.date), format_count(day.total_cnt))?;
    }
    writeln!(out)?;

    writeln!(out, "Entities per holiday")?;
    for category in &snapshot.categories {
        writeln!(
            out,
            "  {:<10}  {:>10}",
            category.holiday.to_string(),
            format_count(category.distinct_instants as u64)
        )?;
    }
    writeln!(out)?;

    write_ranking(out, "Best customers by recency (days)", &snapshot.top_recency, |r| {
        r.recency_days.to_string()
    })?;
    write_ranking(out, "Best customers by monetary", &snapshot.top_monetary, |r| {
        format_count(r.monetary)
    })?;

    writeln!(
        out,
        "Mean recency {} days, mean monetary {}",
        format_optional(snapshot.summary.average_recency, format_recency),
        format_optional(snapshot.summary.average_monetary, format_monetary)
    )?;
    Ok(())
}

fn write_ranking(
    out: &mut String,
    title: &str,
    rows: &[RfmRow],
    value: impl Fn(&RfmRow) -> String,
) -> std::fmt::Result {
    writeln!(out, "{title}")?;
    for (rank, row) in rows.iter().enumerate() {
        writeln!(
            out,
            "  {}. {:<10}  {:>10}",
            rank + 1,
            row.instant.to_string(),
            value(row)
        )?;
    }
    writeln!(out)
}

/// Right-pad `text` to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{DateRange, Key, Record, Table};
    use bikeshare_data::analysis::analyze_range;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn table() -> Table {
        Table::from_records(vec![
            Record::new(Key::Int(1), d(2011, 1, 1), Key::Int(0), 10),
            Record::new(Key::Int(1), d(2011, 1, 2), Key::Int(0), 5),
            Record::new(Key::Int(2), d(2011, 1, 2), Key::Int(1), 20),
            Record::new(Key::Int(3), d(2011, 1, 4), Key::Int(0), 8),
        ])
    }

    #[test]
    fn test_summary_contains_metrics() {
        let t = table();
        let snap = analyze_range(&t, t.date_bounds().unwrap(), 5);
        let text = render_summary(&snap);

        assert!(text.starts_with(TITLE));
        assert!(text.contains("Range: 2011-01-01 → 2011-01-04 (4 records)"));
        assert!(text.contains("Total Sharing"));
        assert!(text.contains("43"));
        // (2 + 2 + 0) / 3
        assert!(text.contains("1.3"));
        assert!(text.contains("  2011-01-02          25"));
        assert!(text.contains("  1. 3"));
    }

    #[test]
    fn test_summary_labels_aligned() {
        let t = table();
        let snap = analyze_range(&t, t.date_bounds().unwrap(), 5);
        let text = render_summary(&snap);
        let width = UnicodeWidthStr::width("Average Recency (days)");
        assert!(text.contains(&format!("{}  43", pad("Total Sharing", width))));
    }

    #[test]
    fn test_summary_empty_range() {
        let t = table();
        let snap = analyze_range(&t, DateRange::new(d(2011, 1, 4), d(2011, 1, 1)), 5);
        let text = render_summary(&snap);
        assert!(text.contains("No data in range"));
        assert!(!text.contains("Daily sharing"));
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }
}
