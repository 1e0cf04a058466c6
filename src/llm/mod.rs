pub mod client;
pub mod failure;
pub mod metrics;
pub mod transport;
pub mod types;

pub use client::InferenceClient;
pub use failure::{AttemptFailure, check_content};
pub use metrics::{
    AttemptRecord, AttemptSummary, JsonReportSink, Metrics, MetricsSink, MetricsSnapshot,
    RunReport,
};
pub use transport::{HttpTransport, Transport};
pub use types::*;
