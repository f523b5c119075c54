//! Charts view: metric cards, the daily line chart, the category bar chart
//! and the two RFM ranking charts.

use bikeshare_core::dates::{days_between, format_date};
use bikeshare_core::formatting::{format_count, format_number};
use bikeshare_core::models::{CategoryCount, DailySharing, DateRange, RfmRow};
use bikeshare_data::analysis::DashboardSnapshot;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::components::render_metric_cards;
use crate::themes::Theme;

/// Widest bar drawn in any bar chart.
const MAX_BAR_WIDTH: u16 = 9;

// ── Entry points ──────────────────────────────────────────────────────────────

/// Render the charts view for a non-empty snapshot into `area`.
pub fn render_charts_view(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
) {
    let [cards, daily, bottom] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(8),
        Constraint::Length(12),
    ])
    .areas(area);

    render_metric_cards(frame, cards, &snapshot.summary, theme);
    render_daily_chart(frame, daily, &snapshot.daily, theme);

    let [categories, recency, monetary] =
        Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(bottom);
    render_category_chart(frame, categories, &snapshot.categories, theme);
    render_rfm_chart(
        frame,
        recency,
        " By Recency (days) ",
        &snapshot.top_recency,
        |row| u64::try_from(row.recency_days).unwrap_or(0),
        theme,
    );
    render_rfm_chart(
        frame,
        monetary,
        " By Monetary ",
        &snapshot.top_monetary,
        |row| row.monetary,
        theme,
    );
}

/// Placeholder for a range that matched nothing.
pub fn render_no_data(frame: &mut Frame, area: Rect, range: &DateRange, theme: &Theme) {
    let hint = match range.validate() {
        Err(e) => e.to_string(),
        Ok(()) => "No records fall inside the selected dates.".to_string(),
    };
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data in range", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(hint, theme.dim)),
        Line::from(Span::styled("Press 'r' to reset the range", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

// ── Daily line chart ──────────────────────────────────────────────────────────

/// `(day offset from the first date, total)` pairs for plotting.
pub fn daily_points(daily: &[DailySharing]) -> Vec<(f64, f64)> {
    let Some(first) = daily.first() else {
        return Vec::new();
    };
    daily
        .iter()
        .map(|d| (days_between(d.date, first.date) as f64, d.total_cnt as f64))
        .collect()
}

fn render_daily_chart(frame: &mut Frame, area: Rect, daily: &[DailySharing], theme: &Theme) {
    let points = daily_points(daily);
    let max_x = points.last().map(|p| p.0).unwrap_or(0.0).max(1.0);
    let max_y = points.iter().map(|p| p.1).fold(0.0_f64, f64::max).max(1.0) * 1.1;

    let x_labels: Vec<String> = match (daily.first(), daily.last()) {
        (Some(first), Some(last)) if first.date != last.date => {
            let middle = &daily[daily.len() / 2];
            vec![
                format_date(first.date),
                format_date(middle.date),
                format_date(last.date),
            ]
        }
        (Some(only), _) => vec![format_date(only.date)],
        _ => Vec::new(),
    };
    let y_labels = vec![
        "0".to_string(),
        format_number(max_y / 2.0, 0),
        format_number(max_y, 0),
    ];

    let datasets = vec![Dataset::default()
        .name("rentals per day")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(" Daily Sharing ", theme.header)),
        )
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, max_y])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

// ── Bar charts ────────────────────────────────────────────────────────────────

/// Bar width that fits `count` bars (plus one-column gaps) into `inner_width`.
pub fn bar_width(inner_width: u16, count: usize) -> u16 {
    let count = u16::try_from(count.max(1)).unwrap_or(u16::MAX);
    let gaps = count.saturating_sub(1);
    (inner_width.saturating_sub(gaps) / count).clamp(1, MAX_BAR_WIDTH)
}

fn render_bars(frame: &mut Frame, area: Rect, title: &str, bars: Vec<Bar>, theme: &Theme) {
    let width = bar_width(area.width.saturating_sub(2), bars.len());
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(title.to_string(), theme.header)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(width)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

fn render_category_chart(
    frame: &mut Frame,
    area: Rect,
    categories: &[CategoryCount],
    theme: &Theme,
) {
    // Largest group is highlighted, as in the ranked charts.
    let top = categories
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| c.distinct_instants)
        .map(|(i, _)| i);

    let bars = categories
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::default()
                .label(Line::from(c.holiday.to_string()))
                .value(c.distinct_instants as u64)
                .text_value(format_count(c.distinct_instants as u64))
                .style(theme.bar_style(if Some(i) == top { 0 } else { 1 }))
                .value_style(theme.chart_bar_value)
        })
        .collect();

    render_bars(frame, area, " Entities per Holiday ", bars, theme);
}

fn render_rfm_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[RfmRow],
    value: impl Fn(&RfmRow) -> u64,
    theme: &Theme,
) {
    let bars = rows
        .iter()
        .enumerate()
        .map(|(rank, row)| {
            let v = value(row);
            Bar::default()
                .label(Line::from(row.instant.to_string()))
                .value(v)
                .text_value(format_count(v))
                .style(theme.bar_style(rank))
                .value_style(theme.chart_bar_value)
        })
        .collect();

    render_bars(frame, area, title, bars, theme);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
