//! Error types and handling for mypv
//!
//! This module defines the error types used throughout the crate. Fetch
//! failures keep their precise cause in [`FetchError`] and reach pollers as a
//! single [`MyPvError::Communication`] kind.

use thiserror::Error;

/// Result type alias for mypv operations
pub type Result<T> = std::result::Result<T, MyPvError>;

/// Main error type for mypv
#[derive(Debug, Error)]
pub enum MyPvError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// HTTP host adapter errors
    #[error("Web server error: {message}")]
    Web { message: String },

    /// Any failure talking to the myPV cloud API
    #[error("Error communicating with API: {0}")]
    Communication(#[from] FetchError),
}

impl MyPvError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        MyPvError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        MyPvError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        MyPvError::Io {
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        MyPvError::Web {
            message: message.into(),
        }
    }

    /// Whether this error came from the HTTP fetcher
    pub fn is_communication(&self) -> bool {
        matches!(self, MyPvError::Communication(_))
    }
}

impl From<std::io::Error> for MyPvError {
    fn from(err: std::io::Error) -> Self {
        MyPvError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for MyPvError {
    fn from(err: serde_yaml::Error) -> Self {
        MyPvError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MyPvError {
    fn from(err: serde_json::Error) -> Self {
        MyPvError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Failure of a single GET against the myPV cloud API
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request exceeded the configured deadline
    #[error("Timeout error fetching {url}")]
    Timeout { url: String },

    /// Connection, DNS or TLS failure
    #[error("Transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response
    #[error("HTTP status {status} from {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Anything else (bad body, builder failures, ...)
    #[error("Unexpected error fetching {url}: {message}")]
    Unexpected { url: String, message: String },
}

impl FetchError {
    /// URL of the failed request
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url }
            | FetchError::Transport { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::Unexpected { url, .. } => url,
        }
    }

    /// Classify a reqwest error raised while sending or reading a request
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus { url, status }
        } else if err.is_connect() || (err.is_request() && has_io_source(&err)) {
            FetchError::Transport { url, source: err }
        } else {
            FetchError::Unexpected {
                url,
                message: err.to_string(),
            }
        }
    }
}

/// Whether an I/O error sits anywhere in the source chain of `err`
fn has_io_source(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if cause.is::<std::io::Error>() {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Outcome of a failed setup-time validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// The device-data endpoint could not be fetched with these credentials
    #[error("cannot_connect")]
    CannotConnect,

    /// Anything else went wrong while validating
    #[error("unknown: {0}")]
    Unknown(String),
}
