//! The statistics pipeline: timed fetch, reshape, clean, sort, summarize.

use crate::config::Config;
use crate::dataset::{Dataset, MetricWidth};
use crate::error::Result;
use crate::pipeline::Metrics;
use crate::region::{RegionCode, RegionSet};
use crate::source::{HttpSource, RawDataset};
use crate::transform::{clean, reshape, sort_descending, summarize};
use std::sync::Arc;
use std::time::Instant;

/// One configured pipeline. Each call to [`run`](Self::run) is an
/// independent activation with its own fetch.
#[derive(Debug)]
pub struct StatisticsPipeline {
    source: HttpSource,
    regions: RegionSet,
    annotated: RegionCode,
    width: MetricWidth,
    title: String,
    metrics: Arc<Metrics>,
}

impl StatisticsPipeline {
    /// Build a pipeline from a configuration, validating it first.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let source = HttpSource::new(&config.source)?;
        Self::with_source(config, source)
    }

    /// Build a pipeline that sends requests through `client`.
    pub fn with_client(config: &Config, client: reqwest::Client) -> anyhow::Result<Self> {
        config.validate()?;
        let source = HttpSource::with_client(client, &config.source);
        Self::with_source(config, source)
    }

    fn with_source(config: &Config, source: HttpSource) -> anyhow::Result<Self> {
        Ok(Self {
            source,
            regions: config.regions.region_set()?,
            annotated: config.regions.annotated()?,
            width: config.metric_width,
            title: config.summary.title.clone(),
            metrics: Metrics::new(),
        })
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Run once. Every failure collapses to `None`; the cause is logged.
    pub async fn run(&self) -> Option<Dataset> {
        match self.try_run().await {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                tracing::warn!("Data unavailable ({}): {}", e.kind(), e);
                None
            }
        }
    }

    /// Run once, keeping the failure cause.
    pub async fn try_run(&self) -> Result<Dataset> {
        self.metrics.add_run_started();
        tracing::info!("Fetching {} (timeout {:?})", self.source.url(), self.source.timeout());

        let result = self.fetch_and_transform().await;
        match &result {
            Ok(dataset) => {
                self.metrics.add_run_succeeded();
                tracing::info!(
                    "Dataset ready: {} regions, mean {:.2}",
                    dataset.len(),
                    dataset.summary().mean
                );
            }
            Err(e) => self.metrics.add_run_failed(e),
        }
        result
    }

    async fn fetch_and_transform(&self) -> Result<Dataset> {
        let fetch_start = Instant::now();
        let fetched = self.source.fetch().await;
        self.metrics.add_fetch_time(fetch_start.elapsed());

        let body = fetched?;
        self.metrics.add_bytes_read(body.len() as u64);
        tracing::debug!("Received {} bytes", body.len());

        let raw = RawDataset::from_slice(&body)?;
        self.transform(raw)
    }

    /// Reshape, clean, sort and summarize a parsed response.
    ///
    /// Consumes the response; it is not needed once the columns exist.
    pub fn transform(&self, raw: RawDataset) -> Result<Dataset> {
        let start = Instant::now();

        let columns = reshape(&raw, &self.regions, self.width)?;
        drop(raw);
        tracing::debug!("Reshaped {} regions", columns.len());

        let columns = clean(columns, self.annotated);
        let columns = sort_descending(&columns);
        let dataset = summarize(columns, &self.title);

        self.metrics.add_transform_time(start.elapsed());
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataUnavailable;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.regions.codes = vec!["AT".to_string(), "BE".to_string(), "DE".to_string()];
        config
    }

    fn sample() -> RawDataset {
        RawDataset::from_slice(
            br#"{
                "dimension": {"geo": {"category": {
                    "index": {"AT": 0, "BE": 1, "DE": 2},
                    "label": {"AT": "Austria", "BE": "Belgium", "DE": "Germany (comment)"}
                }}},
                "value": [50, 60, 70]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_transform_reference_scenario() {
        let pipeline = StatisticsPipeline::new(&small_config()).unwrap();
        let dataset = pipeline.transform(sample()).unwrap();

        let codes: Vec<String> = dataset.codes().iter().map(|c| c.to_string()).collect();
        assert_eq!(codes, ["DE", "BE", "AT"]);
        assert_eq!(dataset.names(), ["Germany", "Belgium", "Austria"]);
        assert_eq!(dataset.metric(), [70, 60, 50]);
        assert_eq!(dataset.summary().mean, 60.0);
        assert_eq!(
            dataset.summary().title,
            "GDP per capita in PPSs for EEA countries in 2017\nBased on Eurostat data"
        );
    }

    #[test]
    fn test_transform_rejects_overflow_for_width() {
        let mut config = small_config();
        config.metric_width = MetricWidth::U8;
        let pipeline = StatisticsPipeline::new(&config).unwrap();

        let raw = RawDataset::from_slice(
            br#"{"dimension": {"geo": {"category": {
                "index": {"AT": 0, "BE": 1, "DE": 2},
                "label": {"AT": "Austria", "BE": "Belgium", "DE": "Germany"}
            }}}, "value": [50, 300, 70]}"#,
        )
        .unwrap();

        let err = pipeline.transform(raw).unwrap_err();
        assert!(matches!(err, DataUnavailable::InvalidValue { ref code, .. } if code == "BE"));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = small_config();
        config.regions.annotated_code = "FR".to_string();
        assert!(StatisticsPipeline::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_source_returns_none() {
        let mut config = small_config();
        config.source.base_url = crate::source::refused_base_url();
        config.source.timeout_ms = 2000;

        let pipeline = StatisticsPipeline::new(&config).unwrap();
        assert!(pipeline.run().await.is_none());

        let snapshot = pipeline.metrics().snapshot();
        assert_eq!(snapshot.runs_started, 1);
        assert_eq!(snapshot.runs_failed, 1);
        assert_eq!(snapshot.runs_succeeded, 0);
    }
}
