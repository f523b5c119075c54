//! Shared foundations for the bike sharing dashboard.
//!
//! Holds the record and derived-row model, the error taxonomy, date parsing,
//! number formatting and the command-line settings used by every other crate.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
