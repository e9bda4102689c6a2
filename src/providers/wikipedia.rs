//! Wikipedia (MediaWiki action API) client for flower summaries.
//!
//! One `action=query` request per lookup asks for the plain-text intro
//! extract and the lead image thumbnail of the page titled after the topic.
//! See: <https://www.mediawiki.org/wiki/API:Query>

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::EncyclopediaConfig;
use crate::telemetry;
use crate::traits::EncyclopediaClient;
use crate::types::{EncyclopediaSummary, normalize_topic};
use crate::{Result, WhatFlowerError};

/// Default endpoint for the English Wikipedia API.
pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Page id MediaWiki uses for titles that do not exist.
const MISSING_PAGE_ID: &str = "-1";

/// Client for the Wikipedia query API.
#[derive(Clone)]
pub struct WikipediaClient {
    http: Client,
    base_url: String,
    thumbnail_size: u32,
}

impl WikipediaClient {
    /// Create a client against English Wikipedia with default settings.
    pub fn new() -> Result<Self> {
        Self::from_config(&EncyclopediaConfig::default())
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(&EncyclopediaConfig {
            base_url: base_url.into(),
            ..EncyclopediaConfig::default()
        })
    }

    /// Create a client from the `[encyclopedia]` config section.
    pub fn from_config(config: &EncyclopediaConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| {
                WhatFlowerError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            thumbnail_size: config.thumbnail_size,
        })
    }

    /// Fetch the intro extract and thumbnail for `topic`.
    ///
    /// The topic is title-cased before it is sent; MediaWiki resolves the
    /// remaining redirect itself (`redirects=1`).
    #[instrument(skip(self), fields(client = "wikipedia"))]
    pub async fn lookup(&self, topic: &str) -> Result<EncyclopediaSummary> {
        let start = Instant::now();
        let result = self.fetch(topic).await;
        record_lookup(start, &result);
        match &result {
            Ok(summary) => debug!(
                title = %summary.title,
                page_id = ?summary.page_id,
                has_extract = summary.has_extract(),
                "encyclopedia lookup finished"
            ),
            Err(e) => warn!(error = %e, "encyclopedia lookup failed"),
        }
        result
    }

    async fn fetch(&self, topic: &str) -> Result<EncyclopediaSummary> {
        let title = normalize_topic(topic);
        let thumbnail_size = self.thumbnail_size.to_string();

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("format", "json"),
                ("action", "query"),
                ("prop", "extracts|pageimages"),
                ("exintro", ""),
                ("explaintext", ""),
                ("titles", title.as_str()),
                ("indexpageids", ""),
                ("redirects", "1"),
                ("pithumbsize", thumbnail_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WhatFlowerError::Http {
                status: status.as_u16(),
                message: format!("Wikipedia API error: {status}"),
            });
        }

        let body = response.text().await?;
        parse_query_response(&body, &title)
    }
}

/// Parse an `action=query` response body into a summary.
///
/// `fallback_title` is used when no page matched.
fn parse_query_response(body: &str, fallback_title: &str) -> Result<EncyclopediaSummary> {
    let response: QueryResponse = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        return Err(WhatFlowerError::Parse(format!(
            "Wikipedia API returned error {}: {}",
            error.code, error.info
        )));
    }

    let Some(mut query) = response.query else {
        return Ok(EncyclopediaSummary::not_found(fallback_title));
    };
    let Some(page_id) = query.pageids.into_iter().next() else {
        return Ok(EncyclopediaSummary::not_found(fallback_title));
    };
    if page_id == MISSING_PAGE_ID {
        return Ok(EncyclopediaSummary::not_found(fallback_title));
    }
    let Some(page) = query.pages.remove(&page_id) else {
        return Ok(EncyclopediaSummary::not_found(fallback_title));
    };
    if page.missing.is_some() || page.invalid.is_some() {
        return Ok(EncyclopediaSummary::not_found(fallback_title));
    }

    Ok(EncyclopediaSummary {
        title: page.title.unwrap_or_else(|| fallback_title.to_string()),
        extract: page.extract.unwrap_or_default(),
        thumbnail_url: page
            .thumbnail
            .and_then(|t| t.source)
            .filter(|source| !source.is_empty()),
        page_id: Some(page_id),
    })
}

fn record_lookup(start: Instant, result: &Result<EncyclopediaSummary>) {
    let status = match result {
        Ok(summary) if summary.has_extract() => "found",
        Ok(_) => "not_found",
        Err(_) => "error",
    };
    metrics::counter!(telemetry::LOOKUPS_TOTAL,
        "client" => "wikipedia",
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::LOOKUP_DURATION_SECONDS, "client" => "wikipedia")
        .record(start.elapsed().as_secs_f64());
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    pageids: Vec<String>,
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    thumbnail: Option<Thumbnail>,
    // Both are flags: present (with an empty string value) or absent.
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    invalid: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Thumbnail {
    #[serde(default)]
    source: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

// ============================================================================
// Trait Implementation
// ============================================================================

#[async_trait]
impl EncyclopediaClient for WikipediaClient {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn lookup(&self, topic: &str) -> Result<EncyclopediaSummary> {
        WikipediaClient::lookup(self, topic).await
    }
}
