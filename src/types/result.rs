//! Terminal value of a pipeline run.

use serde::{Deserialize, Serialize};

use super::{EncyclopediaSummary, normalize_topic};
use crate::error::{ErrorKind, WhatFlowerError};

/// Extract shown when the encyclopedia has no introduction for the label.
pub const NO_INFORMATION_PLACEHOLDER: &str =
    "Couldn't find information about this flower in Wikipedia.";

/// Message shown for any classifier or encyclopedia failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong identifying this flower.";

/// A typed failure plus the underlying error text for logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl PipelineError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Classify a crate error, falling back to `fallback` for errors that
    /// have no pipeline category of their own.
    pub(crate) fn from_error(err: &WhatFlowerError, fallback: ErrorKind) -> Self {
        Self::new(err.kind().unwrap_or(fallback), err.to_string())
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.kind, self.detail)
    }
}

/// Combined classification and enrichment outcome.
///
/// Exactly one of `summary` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    /// Top classifier label (page title once a page matched). Empty when
    /// classification produced no label.
    pub label: String,
    /// Confidence of the top classification, if classification succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<EncyclopediaSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PipelineError>,
}

impl EnrichedResult {
    pub fn success(label: impl Into<String>, confidence: f32, summary: EncyclopediaSummary) -> Self {
        Self {
            label: label.into(),
            confidence: Some(confidence),
            summary: Some(summary),
            error: None,
        }
    }

    pub fn failure(
        label: impl Into<String>,
        confidence: Option<f32>,
        error: PipelineError,
    ) -> Self {
        Self {
            label: label.into(),
            confidence,
            summary: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    /// Label as a heading: every word capitalized.
    pub fn display_title(&self) -> String {
        normalize_topic(&self.label)
    }

    /// Body text for the presentation layer.
    pub fn message(&self) -> &str {
        match (&self.summary, &self.error) {
            (Some(summary), None) => &summary.extract,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Thumbnail to display next to the user's photo, if any.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.summary.as_ref()?.thumbnail_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_has_generic_message() {
        let result = EnrichedResult::failure(
            "rose",
            Some(0.4),
            PipelineError::new(ErrorKind::Network, "timed out"),
        );
        assert!(!result.is_success());
        assert_eq!(result.error_kind(), Some(ErrorKind::Network));
        assert_eq!(result.message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(result.thumbnail_url(), None);
    }

    #[test]
    fn success_shows_extract() {
        let summary = EncyclopediaSummary {
            title: "Daisy".into(),
            extract: "Daisy is a flower.".into(),
            thumbnail_url: Some("http://x/daisy.jpg".into()),
            page_id: Some("123".into()),
        };
        let result = EnrichedResult::success("Daisy", 0.92, summary);
        assert!(result.is_success());
        assert_eq!(result.message(), "Daisy is a flower.");
        assert_eq!(result.thumbnail_url(), Some("http://x/daisy.jpg"));
    }

    #[test]
    fn display_title_capitalizes_label() {
        let result = EnrichedResult::failure(
            "pink primrose",
            None,
            PipelineError::new(ErrorKind::Model, "x"),
        );
        assert_eq!(result.display_title(), "Pink Primrose");
    }

    #[test]
    fn serializes_without_absent_fields() {
        let result =
            EnrichedResult::failure("", None, PipelineError::new(ErrorKind::Model, "no label"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"]["kind"], "model");
        assert!(json.get("summary").is_none());
        assert!(json.get("confidence").is_none());
    }
}
