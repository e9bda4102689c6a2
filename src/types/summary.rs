//! Encyclopedia summary type.

use serde::{Deserialize, Serialize};

/// Plain-text introduction and thumbnail for one encyclopedia page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncyclopediaSummary {
    /// Page title after redirects, or the normalized topic if no page matched.
    pub title: String,
    /// Plain-text introduction. Empty when the page has none or was not found.
    pub extract: String,
    /// Thumbnail image URL, if the page has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Page id the summary was read from; `None` when no page matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

impl EncyclopediaSummary {
    /// Summary for a topic with no matching page.
    pub fn not_found(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extract: String::new(),
            thumbnail_url: None,
            page_id: None,
        }
    }

    /// Whether a page matched the topic.
    pub fn is_found(&self) -> bool {
        self.page_id.is_some()
    }

    /// Whether there is any introduction text to show.
    pub fn has_extract(&self) -> bool {
        !self.extract.trim().is_empty()
    }
}
