//! Main application state and TUI event loop for the dashboard.
//!
//! [`App`] owns the theme, view mode, the date-range control and the last
//! snapshot received from the runtime. Key presses that move the range are
//! turned into [`RangeRequest`]s; answers arrive as [`DashboardUpdate`]s.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use bikeshare_core::models::DateRange;
use bikeshare_core::Result;
use bikeshare_data::analysis::DashboardSnapshot;
use bikeshare_runtime::orchestrator::{DashboardUpdate, RangeRequest};

use crate::components::{Header, RangeControl};
use crate::dashboard_view;
use crate::table_view;
use crate::themes::Theme;

/// How long the loop waits for a key before checking for updates.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Rows moved per `↑`/`↓` press in the tables view.
const SCROLL_STEP: usize = 1;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which body the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Metric cards and charts.
    Charts,
    /// Daily and RFM tables.
    Tables,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Charts => ViewMode::Tables,
            ViewMode::Tables => ViewMode::Charts,
        }
    }
}

// ── TerminalGuard ─────────────────────────────────────────────────────────────

/// Raw mode plus alternate screen, undone on drop.
///
/// The dashboard future can be dropped mid-loop (e.g. by a `select!` on
/// Ctrl+C), so restoration cannot rely on code after the loop.
struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { active: true };
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }

    /// Leave raw mode and the alternate screen. Safe to call twice.
    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub control: RangeControl,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Most recent snapshot, `None` until the first update arrives.
    pub last_snapshot: Option<DashboardSnapshot>,
    /// First visible data row in the tables view.
    pub table_offset: usize,
    /// Id of the newest request sent so far.
    last_request_id: u64,
    /// Id of the request answered by `last_snapshot`.
    last_applied_id: u64,
    /// Request that could not be queued yet (channel full).
    unsent: Option<RangeRequest>,
}

impl App {
    /// `bounds` is the dataset span; `initial` is clamped into it.
    pub fn new(theme_name: &str, bounds: DateRange, initial: DateRange) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode: ViewMode::Charts,
            control: RangeControl::new(bounds, initial),
            should_quit: false,
            last_snapshot: None,
            table_offset: 0,
            last_request_id: 0,
            last_applied_id: 0,
            unsent: None,
        }
    }

    /// Range currently selected in the control.
    pub fn range(&self) -> DateRange {
        self.control.range()
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the interactive dashboard.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the terminal
    /// loop stays on the current thread while updates arrive via `try_recv`.
    /// The loop exits on `q`, `Q`, `Ctrl+C`, or when the runtime goes away.
    pub async fn run_dashboard(
        mut self,
        tx: mpsc::Sender<RangeRequest>,
        mut rx: mpsc::Receiver<DashboardUpdate>,
    ) -> Result<()> {
        let mut guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e.into());
            }

            match poll_key() {
                Ok(Some(key)) => {
                    if let Some(request) = self.handle_key(key) {
                        self.unsent = Some(request);
                    }
                }
                Ok(None) => {}
                Err(e) => break Err(e.into()),
            }

            self.flush_request(&tx);

            // Drain pending updates (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(update) => self.apply_update(update),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        tracing::warn!("dashboard runtime stopped; closing UI");
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        guard.restore()?;
        result
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Apply a key press. Returns a request when the range changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<RangeRequest> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('v') | KeyCode::Char('V') => {
                self.view_mode = self.view_mode.toggled();
                None
            }
            KeyCode::Up => {
                self.table_offset = self.table_offset.saturating_sub(SCROLL_STEP);
                None
            }
            KeyCode::Down => {
                let max = self
                    .last_snapshot
                    .as_ref()
                    .map(table_view::max_offset)
                    .unwrap_or(0);
                self.table_offset = (self.table_offset + SCROLL_STEP).min(max);
                None
            }
            _ => {
                if self.control.handle_key(key) {
                    Some(self.next_request())
                } else {
                    None
                }
            }
        }
    }

    /// Store `update` unless a newer one was already applied.
    pub fn apply_update(&mut self, update: DashboardUpdate) {
        if update.request_id < self.last_applied_id {
            tracing::debug!(request = update.request_id, "dropping stale dashboard update");
            return;
        }
        self.last_applied_id = update.request_id;

        tracing::debug!(
            request = update.request_id,
            range = %update.snapshot.range,
            records = update.snapshot.records_in_range,
            "applying dashboard update"
        );
        self.table_offset = 0;
        self.last_snapshot = Some(update.snapshot);
    }

    fn next_request(&mut self) -> RangeRequest {
        self.last_request_id += 1;
        RangeRequest {
            id: self.last_request_id,
            range: self.control.range(),
        }
    }

    fn flush_request(&mut self, tx: &mpsc::Sender<RangeRequest>) {
        let Some(request) = self.unsent.take() else {
            return;
        };
        match tx.try_send(request) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(request)) => self.unsent = Some(request),
            Err(mpsc::error::TrySendError::Closed(_)) => self.should_quit = true,
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header, control, body, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let (range, records) = self.header_range();
        frame.render_widget(
            Paragraph::new(Header::new(range, records, &self.theme).to_lines()),
            header,
        );

        self.render_control(frame, control);

        match &self.last_snapshot {
            None => frame.render_widget(
                Paragraph::new(Span::styled("Computing…", self.theme.dim)),
                body,
            ),
            Some(snapshot) if snapshot.is_empty() => {
                dashboard_view::render_no_data(frame, body, &snapshot.range, &self.theme)
            }
            Some(snapshot) => match self.view_mode {
                ViewMode::Charts => {
                    dashboard_view::render_charts_view(frame, body, snapshot, &self.theme)
                }
                ViewMode::Tables => table_view::render_tables_view(
                    frame,
                    body,
                    snapshot,
                    self.table_offset,
                    &self.theme,
                ),
            },
        }

        frame.render_widget(Paragraph::new(self.footer_line()), footer);
    }

    /// Range and record count for the header, both taken from the snapshot
    /// being displayed so they never disagree.
    fn header_range(&self) -> (DateRange, usize) {
        match &self.last_snapshot {
            Some(snapshot) => (snapshot.range, snapshot.records_in_range),
            None => (self.range(), 0),
        }
    }

    fn render_control(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            self.control.to_line(&self.theme),
            RangeControl::help_line(&self.theme),
        ];
        frame.render_widget(
            Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(Span::styled(" Date Range ", self.theme.header)),
            ),
            area,
        );
    }

    fn footer_line(&self) -> Line<'_> {
        let view = match self.view_mode {
            ViewMode::Charts => "v tables",
            ViewMode::Tables => "v charts · ↑/↓ scroll",
        };
        let mut spans = vec![Span::styled(format!("q quit · {view}"), self.theme.dim)];
        if let Some(snapshot) = &self.last_snapshot {
            spans.push(Span::styled(
                format!(
                    "   computed in {:.1} ms",
                    snapshot.compute_time_seconds * 1000.0
                ),
                self.theme.dim,
            ));
        }
        Line::from(spans)
    }
}

/// Wait up to [`TICK_RATE`] for a key press.
fn poll_key() -> io::Result<Option<KeyEvent>> {
    if !event::poll(TICK_RATE)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
