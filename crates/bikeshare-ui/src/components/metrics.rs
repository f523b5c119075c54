use bikeshare_core::formatting::{format_count, format_monetary, format_optional, format_recency};
use bikeshare_data::analysis::SharingSummary;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::themes::Theme;

// ── MetricCard ───────────────────────────────────────────────────────────────

/// One headline number with its caption.
pub struct MetricCard<'a> {
    pub label: &'static str,
    pub value: String,
    pub theme: &'a Theme,
}

impl<'a> MetricCard<'a> {
    pub fn new(label: &'static str, value: String, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            theme,
        }
    }

    /// Caption line followed by the value line.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled(self.label, self.theme.label)),
            Line::from(Span::styled(self.value.clone(), self.theme.value)),
        ]
    }
}

/// The three cards shown above the charts, in display order.
pub fn summary_cards<'a>(summary: &SharingSummary, theme: &'a Theme) -> [MetricCard<'a>; 3] {
    [
        MetricCard::new(
            "Total Sharing",
            format_count(summary.total_sharing),
            theme,
        ),
        MetricCard::new(
            "Average Recency (days)",
            format_optional(summary.average_recency, format_recency),
            theme,
        ),
        MetricCard::new(
            "Average Monetary",
            format_optional(summary.average_monetary, format_monetary),
            theme,
        ),
    ]
}

/// Render the summary cards side by side across `area`.
pub fn render_metric_cards(frame: &mut Frame, area: Rect, summary: &SharingSummary, theme: &Theme) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);

    for (card, column) in summary_cards(summary, theme).iter().zip(columns.iter()) {
        let widget = Paragraph::new(card.to_lines())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border),
            );
        frame.render_widget(widget, *column);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::formatting::MISSING_VALUE;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn summary() -> SharingSummary {
        SharingSummary {
            total_sharing: 3_292_679,
            average_recency: Some(365.04),
            average_monetary: Some(4_504.3486),
        }
    }

    #[test]
    fn test_summary_cards_values() {
        let theme = Theme::dark();
        let cards = summary_cards(&summary(), &theme);
        assert_eq!(cards[0].label, "Total Sharing");
        assert_eq!(cards[0].value, "3,292,679");
        assert_eq!(cards[1].value, "365.0");
        assert_eq!(cards[2].value, "4.504,35");
    }

    #[test]
    fn test_summary_cards_empty_range() {
        let theme = Theme::dark();
        let empty = SharingSummary {
            total_sharing: 0,
            average_recency: None,
            average_monetary: None,
        };
        let cards = summary_cards(&empty, &theme);
        assert_eq!(cards[0].value, "0");
        assert_eq!(cards[1].value, MISSING_VALUE);
        assert_eq!(cards[2].value, MISSING_VALUE);
    }

    #[test]
    fn test_card_lines() {
        let theme = Theme::dark();
        let card = MetricCard::new("Total Sharing", "42".to_string(), &theme);
        let lines = card.to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[0].content, "42");
    }

    #[test]
    fn test_render_metric_cards() {
        let backend = TestBackend::new(90, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_metric_cards(frame, area, &summary(), &theme);
            })
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let rendered: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(rendered.contains("Total Sharing"));
        assert!(rendered.contains("3,292,679"));
    }
}
