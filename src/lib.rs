//! whatflower - identify a flower in a photo and describe it
//!
//! This crate classifies a flower image with a pre-trained image model and
//! enriches the top label with the introduction and thumbnail of the
//! matching Wikipedia page. The two external services sit behind the
//! [`ImageClassifier`] and [`EncyclopediaClient`] traits so either can be
//! replaced, e.g. by stubs in tests.
//!
//! # Example (requires `local-inference` feature)
//!
//! ```rust,ignore
//! use whatflower::{ClassifyAndEnrichPipeline, Image};
//! use whatflower::config::ClassifierConfig;
//! use whatflower::providers::OnnxImageClassifier;
//!
//! #[tokio::main]
//! async fn main() -> whatflower::Result<()> {
//!     let classifier = OnnxImageClassifier::new(&ClassifierConfig::new(
//!         "models/flowers.onnx",
//!         "models/flowers.txt",
//!     ))?;
//!
//!     let pipeline = ClassifyAndEnrichPipeline::builder()
//!         .classifier(std::sync::Arc::new(classifier))
//!         .build()?;
//!
//!     let result = pipeline.run(&Image::open("garden.jpg")?).await;
//!     println!("{}", result.display_title());
//!     println!("{}", result.message());
//!     Ok(())
//! }
//! ```
//!
//! # Lookup Example
//!
//! ```rust,no_run
//! use whatflower::WikipediaClient;
//!
//! #[tokio::main]
//! async fn main() -> whatflower::Result<()> {
//!     let summary = WikipediaClient::new()?.lookup("sunflower").await?;
//!     println!("{}: {}", summary.title, summary.extract);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{ErrorKind, Result, WhatFlowerError};
pub use pipeline::{ClassifyAndEnrichPipeline, PipelineBuilder};
pub use providers::WikipediaClient;
pub use traits::{EncyclopediaClient, ImageClassifier};
pub use version::{PKG_VERSION, version_string};

#[cfg(feature = "local-inference")]
pub use providers::OnnxImageClassifier;

// Re-export all types
pub use types::{
    Classification, EncyclopediaSummary, EnrichedResult, GENERIC_FAILURE_MESSAGE, Image,
    NO_INFORMATION_PLACEHOLDER, PipelineError, PipelineState, RunOutcome, normalize_topic,
};

// Token accepted by `ClassifyAndEnrichPipeline::run_with_cancel`.
pub use tokio_util::sync::CancellationToken;
