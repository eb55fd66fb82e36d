//! Error types for the synchronizer.

use gridsync_model::ModelError;
use thiserror::Error;

/// The stored query text for a column could not be turned back into a predicate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Percent-decoding produced bytes that are not UTF-8.
    #[error("column `{column}`: query value is not valid UTF-8 after percent-decoding")]
    Utf8 { column: String },

    /// The decoded text is not JSON.
    #[error("column `{column}`: query value is not valid JSON: {source}")]
    Json {
        column: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON does not describe a column predicate.
    #[error("column `{column}`: {source}")]
    Predicate {
        column: String,
        #[source]
        source: ModelError,
    },
}

impl DecodeError {
    pub fn column(&self) -> &str {
        match self {
            Self::Utf8 { column } | Self::Json { column, .. } | Self::Predicate { column, .. } => {
                column
            }
        }
    }
}

/// Errors from the one-shot row load.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The data endpoint answered with a non-success status.
    #[error("data endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// The body was not a JSON array of objects.
    #[error("row data parse error: {0}")]
    Parse(String),

    /// I/O error reading a local row file.
    #[error("I/O error: {0}")]
    Io(String),

    /// The load was cancelled before it finished.
    #[error("row load cancelled")]
    Cancelled,
}

impl LoadError {
    /// Returns a short message suitable for the grid's error overlay.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the data source. Check your connection and retry.",
            Self::Status { .. } => "The data source refused the request.",
            Self::Parse(_) => "The data source returned data the grid cannot read.",
            Self::Io(_) => "Could not read the row data file.",
            Self::Cancelled => "Loading was cancelled.",
        }
    }

    /// Returns whether offering a retry makes sense.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Io(_) | Self::Cancelled => true,
            Self::Status { status } => *status >= 500 || *status == 429,
            Self::Parse(_) => false,
        }
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ModelError> for LoadError {
    fn from(err: ModelError) -> Self {
        Self::Parse(err.to_string())
    }
}
