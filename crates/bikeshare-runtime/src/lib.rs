//! Runtime layer for the bike sharing dashboard.
//!
//! Owns the loaded dataset and answers range-change requests from the UI on a
//! background tokio task.

pub mod data_manager;
pub mod orchestrator;

pub use bikeshare_core as core;
pub use bikeshare_data as data;
