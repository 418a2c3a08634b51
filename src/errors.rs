use axum::http::StatusCode;
use thiserror::Error;

/// Failure reading or writing the persistent key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored '{key}' is corrupted: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the write (full or disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A rejected import document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("import file is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("import data must be an object")]
    NotAnObject,

    #[error("import data is missing 'historicalData'")]
    MissingHistoricalData,

    #[error("import data is missing 'appVersion'")]
    MissingAppVersion,

    #[error("invalid entry for {key}: {reason}")]
    InvalidEntry { key: String, reason: String },
}

/// A rendering target the surface was asked to paint is absent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("render target '{0}' is missing")]
    MissingTarget(&'static str),
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("setup failed after recovery attempt: {0}")]
    Exhausted(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
