//! Data layer for the bike sharing dashboard.
//!
//! Responsible for loading the CSV dataset, selecting a date range, running
//! the daily / category / RFM aggregators and packaging the results for the
//! presentation layer.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;

pub use bikeshare_core as core;
