//! Terminal UI layer for the bike sharing dashboard.
//!
//! Provides themes, the header, metric cards and date-range control, the
//! charts and tables views, a plain-text summary, and the application event
//! loop built on [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod summary;
pub mod table_view;
pub mod themes;

pub use bikeshare_core as core;
