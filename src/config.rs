//! Configuration for the statistics pipeline.

use crate::dataset::MetricWidth;
use crate::region::{RegionCode, RegionSet, EEA_CODES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where and how to fetch the dataset
    #[serde(default)]
    pub source: SourceConfig,

    /// Which regions to report and which label to clean
    #[serde(default)]
    pub regions: RegionConfig,

    /// Summary attached to the dataset
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Largest admissible metric width (u8, u16 or u32)
    #[serde(default)]
    pub metric_width: MetricWidth,

    /// Optional path to save metrics JSON after a run
    #[serde(default)]
    pub metrics_output_path: Option<String>,
}

/// Remote dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// REST endpoint prefix; the dataset id is appended verbatim
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Eurostat dataset identifier
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Time period filter
    #[serde(default = "default_time")]
    pub time: String,

    /// Numeric precision requested from the API
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Maximum wait for the whole response, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dataset: default_dataset(),
            time: default_time(),
            precision: default_precision(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SourceConfig {
    /// Full request URL, e.g. `.../json/en/tec00114?time=2017&precision=4`.
    pub fn request_url(&self) -> String {
        format!(
            "{}{}?time={}&precision={}",
            self.base_url, self.dataset, self.time, self.precision
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Region set configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Ordered region codes; defines the pre-sort row order
    #[serde(default = "default_region_codes")]
    pub codes: Vec<String>,

    /// The one region whose label carries a trailing annotation to strip
    #[serde(default = "default_annotated_code")]
    pub annotated_code: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            codes: default_region_codes(),
            annotated_code: default_annotated_code(),
        }
    }
}

impl RegionConfig {
    /// Parse the configured codes into a region set.
    pub fn region_set(&self) -> anyhow::Result<RegionSet> {
        RegionSet::parse(&self.codes)
    }

    /// Parse the annotated region code.
    pub fn annotated(&self) -> anyhow::Result<RegionCode> {
        self.annotated_code.parse()
    }
}

/// Summary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Two-line descriptive title
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            regions: RegionConfig::default(),
            summary: SummaryConfig::default(),
            metric_width: MetricWidth::default(),
            metrics_output_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file.
    /// Format is auto-detected from file extension (.yaml, .yml, or .json).
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Config = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            _ => {
                // YAML is a superset of JSON
                serde_yaml::from_str(&contents)?
            }
        };
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        let base = &self.source.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https://, got '{}'", base);
        }
        if self.source.dataset.trim().is_empty() {
            anyhow::bail!("dataset must not be empty");
        }
        if self.source.timeout_ms == 0 {
            anyhow::bail!("timeout_ms must be > 0");
        }

        let regions = self.regions.region_set()?;
        let annotated = self.regions.annotated()?;
        if !regions.contains(&annotated) {
            anyhow::bail!(
                "annotated_code {} is not part of the configured region codes",
                annotated
            );
        }

        if self.summary.title.trim().is_empty() {
            anyhow::bail!("summary title must not be empty");
        }
        Ok(())
    }
}

// Default value functions for serde
fn default_base_url() -> String { "http://ec.europa.eu/eurostat/wdds/rest/data/v2.1/json/en/".to_string() }
fn default_dataset() -> String { "tec00114".to_string() }
fn default_time() -> String { "2017".to_string() }
fn default_precision() -> u32 { 4 }
fn default_timeout_ms() -> u64 { 3000 }
fn default_region_codes() -> Vec<String> { EEA_CODES.iter().map(|c| c.to_string()).collect() }
fn default_annotated_code() -> String { "DE".to_string() }
fn default_title() -> String {
    "GDP per capita in PPSs for EEA countries in 2017\nBased on Eurostat data".to_string()
}
