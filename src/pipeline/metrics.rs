//! Run counters and timings.

use crate::error::DataUnavailable;
use serde::{Serialize, Serializer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Metrics for pipeline runs.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Runs started
    pub runs_started: AtomicU64,

    /// Runs that produced a dataset
    pub runs_succeeded: AtomicU64,

    /// Runs that produced no dataset
    pub runs_failed: AtomicU64,

    /// Failures where the timer won the race
    pub timeouts: AtomicU64,

    /// Failures from a non-success HTTP status
    pub http_errors: AtomicU64,

    /// Failures from an unreadable or malformed response
    pub data_errors: AtomicU64,

    /// Total response bytes received
    pub bytes_read: AtomicU64,

    /// Start time
    start_time: Option<Instant>,

    /// Time spent fetching (microseconds)
    pub fetch_us: AtomicU64,

    /// Time spent reshaping, cleaning, sorting and summarizing (microseconds)
    pub transform_us: AtomicU64,
}

impl Metrics {
    /// Create new metrics.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        })
    }

    /// Record a run start.
    pub fn add_run_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful run.
    pub fn add_run_succeeded(&self) {
        self.runs_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed run, classified by cause.
    pub fn add_run_failed(&self, cause: &DataUnavailable) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
        let counter = match cause {
            DataUnavailable::Timeout(_) => &self.timeouts,
            DataUnavailable::Status { .. } => &self.http_errors,
            DataUnavailable::Parse(_)
            | DataUnavailable::MissingRegion { .. }
            | DataUnavailable::InvalidValue { .. } => &self.data_errors,
            DataUnavailable::Network(_) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record bytes received.
    pub fn add_bytes_read(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record time spent fetching (in microseconds).
    pub fn add_fetch_time(&self, duration: Duration) {
        self.fetch_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Record time spent transforming (in microseconds).
    pub fn add_transform_time(&self, duration: Duration) {
        self.transform_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let runs_started = self.runs_started.load(Ordering::Relaxed);
        let runs_failed = self.runs_failed.load(Ordering::Relaxed);
        let runs_succeeded = self.runs_succeeded.load(Ordering::Relaxed);
        let timeouts = self.timeouts.load(Ordering::Relaxed);
        let http_errors = self.http_errors.load(Ordering::Relaxed);
        let data_errors = self.data_errors.load(Ordering::Relaxed);

        MetricsSnapshot {
            runs_started,
            runs_succeeded,
            runs_failed,
            timeouts,
            http_errors,
            data_errors,
            network_errors: runs_failed.saturating_sub(timeouts + http_errors + data_errors),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
            fetch_secs: self.fetch_us.load(Ordering::Relaxed) as f64 / 1_000_000.0,
            transform_secs: self.transform_us.load(Ordering::Relaxed) as f64 / 1_000_000.0,
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub runs_started: u64,
    pub runs_succeeded: u64,
    pub runs_failed: u64,
    pub timeouts: u64,
    pub http_errors: u64,
    pub data_errors: u64,
    pub network_errors: u64,
    pub bytes_read: u64,
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
    /// Total time spent fetching (seconds)
    pub fetch_secs: f64,
    /// Total time spent transforming (seconds)
    pub transform_secs: f64,
}

impl MetricsSnapshot {
    /// Save metrics to a JSON file.
    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!("Metrics saved to {}", path);
        Ok(())
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Runs: {} started, {} succeeded, {} failed \
             (timeout {}, http {}, data {}, network {}) | \
             Read: {:.1} KB | Fetch: {:.3}s | Transform: {:.3}s | Elapsed: {:.1}s",
            self.runs_started,
            self.runs_succeeded,
            self.runs_failed,
            self.timeouts,
            self.http_errors,
            self.data_errors,
            self.network_errors,
            self.bytes_read as f64 / 1024.0,
            self.fetch_secs,
            self.transform_secs,
            self.elapsed.as_secs_f64(),
        )
    }
}
