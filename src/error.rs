//! Failure causes for a pipeline run.
//!
//! Every cause maps to the same observable outcome (no dataset); the variants
//! exist so the cause can be logged and counted.

use std::time::Duration;

/// Why a pipeline run produced no dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataUnavailable {
    /// Transport-level failure (DNS, connect, TLS, reset, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP error {status}")]
    Status {
        /// Status code returned by the server
        status: reqwest::StatusCode,
    },

    /// The timer won the race against the request
    #[error("Connection timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Body was not a JSON document of the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A designated region is absent from the response
    #[error("Region {code} has no {field} in the response")]
    MissingRegion {
        /// Region code that could not be resolved
        code: String,
        /// Which part of the response lacked it (index, label or value)
        field: &'static str,
    },

    /// A region's value cannot be stored as a metric
    #[error("Region {code} has invalid value {value}: {reason}")]
    InvalidValue {
        code: String,
        value: f64,
        reason: String,
    },
}

impl DataUnavailable {
    /// Short label for logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Timeout(_) => "timeout",
            Self::Parse(_) => "parse",
            Self::MissingRegion { .. } => "missing_region",
            Self::InvalidValue { .. } => "invalid_value",
        }
    }
}

/// Result alias for pipeline stages.
pub type Result<T> = std::result::Result<T, DataUnavailable>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_cause() {
        let err = DataUnavailable::Status {
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(err.to_string().contains("404"));

        let err = DataUnavailable::Timeout(Duration::from_millis(3000));
        assert_eq!(err.to_string(), "Connection timeout after 3000ms");

        let err = DataUnavailable::MissingRegion {
            code: "DE".to_string(),
            field: "label",
        };
        assert_eq!(err.to_string(), "Region DE has no label in the response");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(DataUnavailable::Timeout(Duration::ZERO).kind(), "timeout");
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(DataUnavailable::from(parse).kind(), "parse");
        let invalid = DataUnavailable::InvalidValue {
            code: "AT".to_string(),
            value: -1.0,
            reason: "negative".to_string(),
        };
        assert_eq!(invalid.kind(), "invalid_value");
    }
}
