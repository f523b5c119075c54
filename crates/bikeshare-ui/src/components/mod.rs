//! Small widgets shared by the dashboard views.

pub mod header;
pub mod metrics;
pub mod range_control;

pub use header::Header;
pub use metrics::{render_metric_cards, MetricCard};
pub use range_control::{RangeControl, RangeField};
