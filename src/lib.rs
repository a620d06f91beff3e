//! Eurostat GDP Pipeline
//!
//! Fetches the Eurostat `tec00114` dataset (GDP per capita in PPS), reshapes it
//! into parallel columns for a fixed set of regions, and returns it sorted by
//! descending value with a summary attached.
//!
//! # Architecture
//!
//! The pipeline consists of:
//!
//! - **Source**: HTTP fetch raced against a timeout, JSON-stat parsing
//! - **Transform**: reshape, label cleanup, stable descending sort, mean
//! - **Pipeline**: single-use worker task, run orchestration and metrics
//! - **Report**: plain-text bar chart of a result
//!
//! # Usage
//!
//! ```no_run
//! use eurostat_gdp::{Config, run_pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_file(std::path::Path::new("config.yaml"))?;
//!     match run_pipeline(config).await? {
//!         Some(dataset) => println!("{} regions", dataset.len()),
//!         None => println!("Data cannot be retrieved"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod region;
pub mod report;
pub mod source;
pub mod transform;

pub use config::Config;
pub use dataset::{Columns, Dataset, Metric, MetricWidth, Record, Summary};
pub use error::DataUnavailable;
pub use pipeline::{Metrics, PipelineWorker, StatisticsPipeline};
pub use region::{RegionCode, RegionSet};
pub use report::render_report;

use anyhow::Result;

/// Run the pipeline once in an isolated worker task.
///
/// Configuration errors are returned as `Err`; an unavailable dataset is
/// `Ok(None)`.
pub async fn run_pipeline(config: Config) -> Result<Option<Dataset>> {
    // Validates the configuration
    let pipeline = StatisticsPipeline::new(&config)?;

    tracing::info!("Starting Eurostat GDP pipeline");
    tracing::info!(
        "Dataset {} for {}, {} regions",
        config.source.dataset,
        config.source.time,
        config.regions.codes.len()
    );

    let metrics = pipeline.metrics().clone();

    let worker = PipelineWorker::spawn(pipeline);
    let dataset = worker.activate().await;

    let snapshot = metrics.snapshot();
    tracing::info!("Pipeline complete: {}", snapshot);

    if let Some(path) = &config.metrics_output_path {
        if let Err(e) = snapshot.save_to_file(path) {
            tracing::warn!("Failed to save metrics to {}: {}", path, e);
        }
    }

    Ok(dataset)
}

/// Build a Tokio runtime with the specified configuration.
pub fn build_runtime(worker_threads: Option<usize>) -> Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();

    if let Some(threads) = worker_threads {
        builder.worker_threads(threads);
    }

    builder.enable_all();

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_pipeline_rejects_invalid_config() {
        let mut config = Config::default();
        config.source.timeout_ms = 0;
        assert!(run_pipeline(config).await.is_err());
    }

    #[tokio::test]
    async fn test_run_pipeline_unreachable_is_none_and_saves_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let metrics_path = dir.path().join("metrics.json");

        let mut config = Config::default();
        config.source.base_url = source::refused_base_url();
        config.source.timeout_ms = 2000;
        config.metrics_output_path = Some(metrics_path.to_str().unwrap().to_string());

        assert!(run_pipeline(config).await.unwrap().is_none());

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&metrics_path).unwrap()).unwrap();
        assert_eq!(saved["runs_started"], 1);
        assert_eq!(saved["runs_failed"], 1);
    }

    #[test]
    fn test_build_runtime() {
        let runtime = build_runtime(Some(2)).unwrap();
        assert_eq!(runtime.block_on(async { 1 + 1 }), 2);
    }
}
