//! Component traits for the classify-then-enrich pipeline.
//!
//! The pipeline depends only on these two contracts, so the ONNX classifier
//! and the Wikipedia client can be swapped for stubs in tests or for other
//! backends in production.
//!
//! # Example
//!
//! ```ignore
//! struct AlwaysDaisy;
//!
//! #[async_trait]
//! impl ImageClassifier for AlwaysDaisy {
//!     fn name(&self) -> &str { "always-daisy" }
//!
//!     async fn classify(&self, _image: &Image) -> Result<Vec<Classification>> {
//!         Ok(vec![Classification::new("daisy", 1.0)])
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::types::{Classification, EncyclopediaSummary, Image};

// ============================================================================
// Image Classifier
// ============================================================================

/// Maps an image to ranked label/confidence pairs.
///
/// Implementations load their model once and must be safe to call
/// concurrently.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Classifier name for logging/debugging.
    fn name(&self) -> &str;

    /// Classify an image.
    ///
    /// On success the classifications are ordered by descending confidence.
    /// Returns [`WhatFlowerError::Model`](crate::WhatFlowerError::Model) when
    /// the model is unavailable or cannot process the image.
    async fn classify(&self, image: &Image) -> Result<Vec<Classification>>;
}

// ============================================================================
// Encyclopedia Client
// ============================================================================

/// Looks up a short plain-text summary for a topic.
#[async_trait]
pub trait EncyclopediaClient: Send + Sync {
    /// Client name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the summary for `topic`.
    ///
    /// A topic with no matching page, or a page without an introduction, is
    /// not an error: the summary comes back with an empty extract. Transport
    /// failures are `Network`/`Http` errors and malformed responses are
    /// `Parse`/`Json` errors. Nothing is retried.
    async fn lookup(&self, topic: &str) -> Result<EncyclopediaSummary>;
}
