// src/cdx/error.rs
// =============================================================================
// Error types for the CDX client.
//
// Only a CatalogError stops a run. An IndexQueryError is recorded and the
// run keeps going with the remaining indexes. A line that is not a valid
// record is not an error at all, it is just counted and skipped.
// =============================================================================

use thiserror::Error;

/// Failure of a single HTTP exchange.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    /// Connection, TLS, redirect or body errors.
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

/// The list of indexes could not be obtained. Fatal to the run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch index list: {0}")]
    Fetch(#[from] FetchError),

    #[error("index list is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One index gave up after all of its attempts.
#[derive(Debug, Error)]
#[error("{index}: {attempts} attempt(s) failed, last error: {source}")]
pub struct IndexQueryError {
    pub index: String,
    pub attempts: u32,
    #[source]
    pub source: FetchError,
}
