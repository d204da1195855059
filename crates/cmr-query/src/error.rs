//! Error types for catalog queries.

use chrono::{DateTime, Utc};
use thiserror::Error;
use viirs_common::TimeParseError;

/// Result type for catalog queries.
pub type QueryResult<T> = Result<T, QueryError>;

/// Failures of the transport that carries a search to the catalog.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, timeout or protocol failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status
    #[error("catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not a UMM-JSON search result
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Errors raised to callers of the query builder.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Any transport failure. The cause is kept as the error source.
    #[error("catalog unreachable")]
    CatalogUnreachable(#[source] TransportError),

    /// The window ends before it starts
    #[error("temporal range ends ({end}) before it starts ({start})")]
    InvalidTemporalRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A date could not be parsed
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A spatial filter cannot be expressed as a catalog query
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TimeParseError> for QueryError {
    fn from(err: TimeParseError) -> Self {
        Self::InvalidDate(err.to_string())
    }
}

impl From<serde_yaml::Error> for QueryError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_catalog_unreachable_keeps_cause() {
        let err = QueryError::CatalogUnreachable(TransportError::Status {
            status: 503,
            body: "maintenance".to_string(),
        });
        assert_eq!(err.to_string(), "catalog unreachable");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "catalog returned HTTP 503: maintenance");
    }

    #[test]
    fn test_json_error_is_invalid_response() {
        let err: TransportError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, TransportError::InvalidResponse(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<QueryError>();
        assert_impl::<TransportError>();
    }
}
