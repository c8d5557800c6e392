//! Error types for dependency descriptor lookups

use thiserror::Error;

/// Dependency resolution errors
#[derive(Debug, Error)]
pub enum DependencyError {
    // ============ Network Errors ============
    #[error("HTTP error fetching {url}: {status}")]
    HttpError { url: String, status: u16 },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ============ Descriptor Errors ============
    #[error("Failed to parse dependency descriptor {url}: {message}")]
    ParseError { url: String, message: String },

    #[error("Dependency descriptor {url} has no dependencies list")]
    MissingDependencies { url: String },

    #[error("Failed to build HTTP client: {message}")]
    ClientError { message: String },
}

/// Result type for dependency lookups
pub type Result<T> = std::result::Result<T, DependencyError>;

impl From<reqwest::Error> for DependencyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DependencyError::Timeout {
                seconds: crate::dependencies::REQUEST_TIMEOUT_SECS,
            }
        } else if let Some(status) = e.status() {
            DependencyError::HttpError {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                status: status.as_u16(),
            }
        } else if e.is_connect() {
            DependencyError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else {
            DependencyError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}
