use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::dates::parse_cli_date;
use crate::models::DateRange;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive bike sharing dashboard
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare-dashboard",
    about = "Interactive bike sharing dashboard with a date-range filter",
    version
)]
pub struct Settings {
    /// Input CSV with instant, dteday, holiday and cnt columns
    #[arg(long, default_value = "all_data.csv", env = "BIKESHARE_DATA")]
    pub data: PathBuf,

    /// First day of the initial range (defaults to the earliest date in the data)
    #[arg(long, value_parser = parse_cli_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the initial range (defaults to the latest date in the data)
    #[arg(long, value_parser = parse_cli_date)]
    pub end: Option<NaiveDate>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Number of entities shown in each RFM ranking (1-50)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..=50))]
    pub top: u16,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Initial filter range: explicit `--start` / `--end` values win, missing
    /// ends fall back to the dataset `bounds`.
    pub fn initial_range(&self, bounds: &DateRange) -> DateRange {
        DateRange::new(
            self.start.unwrap_or(bounds.start),
            self.end.unwrap_or(bounds.end),
        )
    }

    /// Ranking length as `usize`.
    pub fn top_n(&self) -> usize {
        usize::from(self.top)
    }

    /// `true` when the interactive terminal dashboard was requested.
    pub fn is_interactive(&self) -> bool {
        self.view == "dashboard"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
