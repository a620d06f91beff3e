//! Eurostat GDP Pipeline CLI
//!
//! Fetches GDP per capita for EEA countries and prints it as a bar chart or JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eurostat_gdp::{build_runtime, render_report, run_pipeline, Config};

/// Config file read when `--config` is not given. Missing is not an error.
const DEFAULT_CONFIG: &str = "config.yaml";

/// Width of the longest bar in the text report.
const DEFAULT_BAR_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "eurostat-gdp")]
#[command(about = "Fetch and rank Eurostat GDP per capita for EEA countries", long_about = None)]
struct Cli {
    /// Path to configuration file [default: config.yaml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the fetch timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once (default if no command specified)
    Run {
        /// Print the dataset as JSON (`null` when unavailable)
        #[arg(long)]
        json: bool,

        /// Width of the longest bar in the text report
        #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
        bar_width: usize,
    },

    /// Validate configuration
    Validate,

    /// Generate a sample configuration file
    GenerateConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => {
            run_command(cli.config.as_deref(), cli.timeout_ms, false, DEFAULT_BAR_WIDTH)?;
        }

        Some(Commands::Run { json, bar_width }) => {
            run_command(cli.config.as_deref(), cli.timeout_ms, json, bar_width)?;
        }

        Some(Commands::Validate) => {
            validate_command(cli.config.as_deref(), cli.timeout_ms)?;
        }

        Some(Commands::GenerateConfig { output }) => {
            generate_config_command(output)?;
        }
    }

    Ok(())
}

/// Load the configuration and apply command-line overrides.
fn load_config(config_path: Option<&Path>, timeout_ms: Option<u64>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::from_file(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG))?,
        None => {
            tracing::info!("No {} found, using built-in defaults", DEFAULT_CONFIG);
            Config::default()
        }
    };

    // Apply overrides
    if let Some(t) = timeout_ms {
        config.source.timeout_ms = t;
    }

    config.validate()?;
    Ok(config)
}

fn run_command(
    config_path: Option<&Path>,
    timeout_ms: Option<u64>,
    json: bool,
    bar_width: usize,
) -> Result<()> {
    let config = load_config(config_path, timeout_ms)?;

    // Build and run Tokio runtime
    let runtime = build_runtime(None)?;
    let dataset = runtime.block_on(async { run_pipeline(config).await })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
    } else {
        print!("{}", render_report(dataset.as_ref(), bar_width));
    }

    Ok(())
}

fn validate_command(config_path: Option<&Path>, timeout_ms: Option<u64>) -> Result<()> {
    let config = load_config(config_path, timeout_ms)?;
    println!("Configuration is valid");
    println!("Request URL: {}", config.source.request_url());
    println!("Regions: {}", config.regions.codes.join(", "));
    Ok(())
}

fn generate_config_command(output: PathBuf) -> Result<()> {
    // Generate a commented YAML config
    let yaml = r#"# Eurostat GDP Pipeline Configuration

# === SOURCE: Where to fetch the dataset from ===
source:
  # REST endpoint prefix; the dataset id is appended directly
  base_url: "http://ec.europa.eu/eurostat/wdds/rest/data/v2.1/json/en/"

  # tec00114: GDP per capita in PPS (EU27 = 100)
  dataset: "tec00114"

  # Time period filter
  time: "2017"

  # Numeric precision requested from the API
  precision: 4

  # Maximum wait for the whole response in milliseconds.
  # The run reports "Data cannot be retrieved" once this elapses.
  timeout_ms: 3000

# === REGIONS: Which countries to report, in this order ===
regions:
  codes: [AT, BE, BG, HR, CY, CZ, DK, EE, FI, FR, DE, EL, HU, IS, IE, IT,
          LV, LT, LU, MT, NL, NO, PL, PT, RO, SK, SI, ES, SE, CH, UK]

  # Region whose label carries a trailing " (...)" note to strip
  annotated_code: "DE"

# === SUMMARY: Title attached to the result ===
summary:
  title: "GDP per capita in PPSs for EEA countries in 2017\nBased on Eurostat data"

# Largest admissible value width: u8, u16 or u32.
# Values above the maximum fail the run instead of wrapping.
metric_width: u16

# Save run metrics as JSON (optional)
# metrics_output_path: "metrics.json"
"#;

    std::fs::write(&output, yaml)?;
    println!("Generated sample configuration at: {}", output.display());

    Ok(())
}
