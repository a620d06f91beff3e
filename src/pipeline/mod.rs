//! Pipeline orchestration: the run itself, its worker and its metrics.

mod metrics;
mod runner;
mod worker;


pub use metrics::{Metrics, MetricsSnapshot};
pub use runner::StatisticsPipeline;
pub use worker::PipelineWorker;
