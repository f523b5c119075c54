use bikeshare_core::formatting::format_count;
use bikeshare_core::models::DateRange;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Decoration placed either side of the title.
pub const ACCENT: &str = "◆ ◇ ◆";

pub const TITLE: &str = "BIKE SHARING DASHBOARD";

/// Dashboard header rendering four lines:
///
/// 1. Title between accents.
/// 2. A `=` separator as wide as the title line.
/// 3. `[ start → end | N records ]`.
/// 4. An empty line.
pub struct Header<'a> {
    pub range: DateRange,
    /// Records matching `range`.
    pub records: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(range: DateRange, records: usize, theme: &'a Theme) -> Self {
        Self {
            range,
            records,
            theme,
        }
    }

    /// Display width of the title line in terminal columns.
    pub fn title_width() -> usize {
        UnicodeWidthStr::width(ACCENT) * 2 + UnicodeWidthStr::width(TITLE) + 2
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let noun = if self.records == 1 { "record" } else { "records" };

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(format!(" {TITLE} "), self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(
                "=".repeat(Self::title_width()),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.range.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} {}", format_count(self.records as u64), noun),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
