//! Tables view: per-day totals and the RFM table.
//!
//! Renders bordered [`ratatui::widgets::Table`]s. The daily table ends with a
//! highlighted totals row; both tables scroll together by `offset` rows.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use bikeshare_core::dates::format_date;
use bikeshare_core::formatting::{format_count, format_monetary, format_optional, format_recency};
use bikeshare_data::analysis::DashboardSnapshot;

use crate::themes::Theme;

/// Render both tables side by side, skipping the first `offset` data rows.
pub fn render_tables_view(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    offset: usize,
    theme: &Theme,
) {
    let [daily, rfm] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);
    render_daily_table(frame, daily, snapshot, offset, theme);
    render_rfm_table(frame, rfm, snapshot, offset, theme);
}

/// Largest useful scroll offset for `snapshot`.
pub fn max_offset(snapshot: &DashboardSnapshot) -> usize {
    snapshot
        .daily
        .len()
        .max(snapshot.rfm.len())
        .saturating_sub(1)
}

fn zebra(i: usize, theme: &Theme) -> ratatui::style::Style {
    if i % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

fn header_row(titles: &[&'static str], theme: &Theme) -> Row<'static> {
    Row::new(
        titles
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header))
            .collect::<Vec<_>>(),
    )
    .height(1)
}

fn bordered(title: String, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(title)
}

fn render_daily_table(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    offset: usize,
    theme: &Theme,
) {
    let mut rows: Vec<Row> = snapshot
        .daily
        .iter()
        .enumerate()
        .skip(offset)
        .map(|(i, day)| {
            Row::new(vec![
                Cell::from(format_date(day.date)),
                Cell::from(format_count(day.total_cnt)),
            ])
            .style(zebra(i, theme))
        })
        .collect();

    // Totals always follow the visible rows.
    rows.push(
        Row::new(vec![
            Cell::from(format!("TOTAL ({} days)", snapshot.daily.len())),
            Cell::from(format_count(snapshot.summary.total_sharing)),
        ])
        .style(theme.table_total),
    );

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Length(14)])
        .header(header_row(&["Date", "Rentals"], theme))
        .block(bordered(" Daily Sharing ".to_string(), theme))
        .style(theme.text);

    frame.render_widget(table, area);
}

fn render_rfm_table(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    offset: usize,
    theme: &Theme,
) {
    let mut rows: Vec<Row> = snapshot
        .rfm
        .iter()
        .enumerate()
        .skip(offset)
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(row.instant.to_string()),
                Cell::from(row.recency_days.to_string()),
                Cell::from(format_count(row.monetary)),
            ])
            .style(zebra(i, theme))
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from("MEAN"),
            Cell::from(format_optional(
                snapshot.summary.average_recency,
                format_recency,
            )),
            Cell::from(format_optional(
                snapshot.summary.average_monetary,
                format_monetary,
            )),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(&["Instant", "Recency (d)", "Monetary"], theme))
        .block(bordered(
            format!(" RFM ({} entities) ", format_count(snapshot.rfm.len() as u64)),
            theme,
        ))
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
