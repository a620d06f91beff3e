//! Timed HTTP fetch.
//!
//! The request (status line, headers and body) races a timer; whichever
//! settles first decides the outcome and the other future is dropped.

use crate::config::SourceConfig;
use crate::error::{DataUnavailable, Result};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;

/// Race `request` against a timer of `timeout`.
///
/// Returns the request's own result if it settles first, otherwise
/// [`DataUnavailable::Timeout`]. The losing future is dropped, not awaited.
pub async fn race_timeout<F, T>(request: F, timeout: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        result = request => result,
        _ = tokio::time::sleep(timeout) => Err(DataUnavailable::Timeout(timeout)),
    }
}

/// HTTP source for one fixed dataset URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpSource {
    /// Create a source with a default client.
    pub fn new(config: &SourceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a source that reuses an existing client.
    pub fn with_client(client: reqwest::Client, config: &SourceConfig) -> Self {
        Self {
            client,
            url: config.request_url(),
            timeout: config.timeout(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the response body, bounded by the configured timeout.
    pub async fn fetch(&self) -> Result<Bytes> {
        race_timeout(self.request(), self.timeout).await
    }

    async fn request(&self) -> Result<Bytes> {
        tracing::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(CONTENT_TYPE, "text/plain; charset=UTF-8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataUnavailable::Status { status });
        }

        Ok(response.bytes().await?)
    }
}

/// Base URL of a loopback port that was just released, so connecting is refused.
#[cfg(test)]
pub(crate) fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_pending_request_times_out() {
        let start = tokio::time::Instant::now();
        let result: Result<()> =
            race_timeout(std::future::pending(), Duration::from_millis(3000)).await;

        assert!(matches!(result, Err(DataUnavailable::Timeout(d)) if d == Duration::from_millis(3000)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3000));
        assert!(elapsed < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_settling_first_wins() {
        let request = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(7)
        };
        let result = race_timeout(request, Duration::from_millis(3000)).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_error_is_kept() {
        let request = async {
            Err::<(), _>(DataUnavailable::Status {
                status: reqwest::StatusCode::NOT_FOUND,
            })
        };
        let result = race_timeout(request, Duration::from_millis(3000)).await;
        assert!(matches!(result, Err(DataUnavailable::Status { .. })));
    }

    #[tokio::test]
    async fn test_real_clock_timeout_is_bounded() {
        let start = Instant::now();
        let result: Result<()> =
            race_timeout(std::future::pending(), Duration::from_millis(50)).await;
        assert!(matches!(result, Err(DataUnavailable::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_source_uses_config_url() {
        let config = SourceConfig {
            base_url: "http://127.0.0.1:9/data/".to_string(),
            timeout_ms: 250,
            ..Default::default()
        };
        let source = HttpSource::new(&config).unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/data/tec00114?time=2017&precision=4");
        assert_eq!(source.timeout(), Duration::from_millis(250));
    }
}
