//! whatflower error types

use serde::{Deserialize, Serialize};

/// whatflower error types
#[derive(Debug, thiserror::Error)]
pub enum WhatFlowerError {
    // Classifier errors
    /// The model could not be loaded or could not process the image.
    #[error("model error: {0}")]
    Model(String),

    // Encyclopedia transport errors
    #[error("HTTP error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Http { status: u16, message: String },

    // Data errors
    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pipeline run cancelled")]
    Cancelled,
}

impl WhatFlowerError {
    /// The pipeline-level category this error belongs to.
    ///
    /// `None` for errors that never surface inside an
    /// [`EnrichedResult`](crate::EnrichedResult) (configuration, I/O,
    /// cancellation).
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Model(_) => Some(ErrorKind::Model),
            Self::Network(_) | Self::Http { .. } => Some(ErrorKind::Network),
            Self::Parse(_) | Self::Json(_) => Some(ErrorKind::Parse),
            Self::Configuration(_) | Self::Io(_) | Self::Cancelled => None,
        }
    }
}

impl From<reqwest::Error> for WhatFlowerError {
    fn from(err: reqwest::Error) -> Self {
        // Body decoding is the only reqwest failure that is about the payload
        // rather than the transport.
        if err.is_decode() {
            WhatFlowerError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            WhatFlowerError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            WhatFlowerError::Network(err.to_string())
        }
    }
}

/// Typed failure category reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Classifier unavailable, failed on the input, or produced no label.
    Model,
    /// Transport-level failure contacting the encyclopedia.
    Network,
    /// Encyclopedia response was malformed or had an unexpected shape.
    Parse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Network => "network",
            Self::Parse => "parse",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for whatflower operations
pub type Result<T> = std::result::Result<T, WhatFlowerError>;
