//! Keyboard-driven start/end date picker.
//!
//! Both dates stay inside the dataset bounds. Start may move past end; the
//! resulting inverted range is passed on as-is and renders as an empty view.

use bikeshare_core::dates::{format_date, shift_days};
use bikeshare_core::models::DateRange;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Days moved by `PgUp` / `PgDn`.
pub const PAGE_DAYS: i64 = 30;

/// Which date field receives arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct RangeControl {
    bounds: DateRange,
    start: NaiveDate,
    end: NaiveDate,
    focus: RangeField,
}

impl RangeControl {
    /// `initial` is clamped into `bounds`.
    pub fn new(bounds: DateRange, initial: DateRange) -> Self {
        let initial = initial.clamp_to(&bounds);
        Self {
            bounds,
            start: initial.start,
            end: initial.end,
            focus: RangeField::Start,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    pub fn bounds(&self) -> DateRange {
        self.bounds
    }

    pub fn focus(&self) -> RangeField {
        self.focus
    }

    // ── Mutations (each returns `true` when the range changed) ────────────

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            RangeField::Start => RangeField::End,
            RangeField::End => RangeField::Start,
        };
    }

    /// Move the focused date by `days`, stopping at the bounds.
    pub fn shift(&mut self, days: i64) -> bool {
        let current = self.focused_date();
        self.set_focused(shift_days(current, days))
    }

    pub fn jump_to_min(&mut self) -> bool {
        self.set_focused(self.bounds.start)
    }

    pub fn jump_to_max(&mut self) -> bool {
        self.set_focused(self.bounds.end)
    }

    /// Back to the full dataset span.
    pub fn reset(&mut self) -> bool {
        let before = self.range();
        self.start = self.bounds.start;
        self.end = self.bounds.end;
        self.range() != before
    }

    /// Apply a key press. Returns `true` when the range changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                false
            }
            KeyCode::Left => self.shift(-1),
            KeyCode::Right => self.shift(1),
            KeyCode::PageDown => self.shift(-PAGE_DAYS),
            KeyCode::PageUp => self.shift(PAGE_DAYS),
            KeyCode::Home => self.jump_to_min(),
            KeyCode::End => self.jump_to_max(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => false,
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    pub fn to_line<'a>(&self, theme: &'a Theme) -> Line<'a> {
        let mut spans = vec![
            Span::styled("Start ", theme.label),
            Span::styled(
                format!(" {} ", format_date(self.start)),
                theme.field_style(self.focus == RangeField::Start),
            ),
            Span::styled("   End ", theme.label),
            Span::styled(
                format!(" {} ", format_date(self.end)),
                theme.field_style(self.focus == RangeField::End),
            ),
        ];

        if self.range().is_inverted() {
            spans.push(Span::styled("   start is after end", theme.warning));
        }

        Line::from(spans)
    }

    /// Key reference shown under the date fields.
    pub fn help_line<'a>(theme: &'a Theme) -> Line<'a> {
        Line::from(Span::styled(
            "Tab field · ←/→ day · PgUp/PgDn 30 days · Home/End limits · r reset",
            theme.dim,
        ))
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn focused_date(&self) -> NaiveDate {
        match self.focus {
            RangeField::Start => self.start,
            RangeField::End => self.end,
        }
    }

    fn set_focused(&mut self, date: NaiveDate) -> bool {
        let date = date.clamp(self.bounds.start, self.bounds.end);
        let slot = match self.focus {
            RangeField::Start => &mut self.start,
            RangeField::End => &mut self.end,
        };
        if *slot == date {
            return false;
        }
        *slot = date;
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
