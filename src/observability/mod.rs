pub mod metrics;

pub use metrics::{install_recorder, MetricName};
