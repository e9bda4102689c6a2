//! Builder for configuring pipeline instances

use std::sync::Arc;

use super::ClassifyAndEnrichPipeline;
use crate::config::{Config, EncyclopediaConfig};
use crate::providers::WikipediaClient;
use crate::traits::{EncyclopediaClient, ImageClassifier};
use crate::{Result, WhatFlowerError};

/// Builder for [`ClassifyAndEnrichPipeline`].
///
/// A classifier is mandatory. The encyclopedia defaults to English Wikipedia
/// when none is configured.
#[derive(Default)]
pub struct PipelineBuilder {
    classifier: Option<Arc<dyn ImageClassifier>>,
    encyclopedia: Option<Arc<dyn EncyclopediaClient>>,
    encyclopedia_config: Option<EncyclopediaConfig>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `classifier` for step one.
    pub fn classifier(mut self, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use `client` for enrichment instead of the default Wikipedia client.
    pub fn encyclopedia(mut self, client: Arc<dyn EncyclopediaClient>) -> Self {
        self.encyclopedia = Some(client);
        self
    }

    /// Configure the default Wikipedia client.
    ///
    /// Ignored when an explicit client is set with [`encyclopedia`](Self::encyclopedia).
    pub fn wikipedia(mut self, config: EncyclopediaConfig) -> Self {
        self.encyclopedia_config = Some(config);
        self
    }

    /// Configure from a loaded [`Config`].
    ///
    /// Loads the local ONNX classifier when the `[classifier]` section is
    /// present.
    pub fn config(mut self, config: &Config) -> Result<Self> {
        self.encyclopedia_config = Some(config.encyclopedia.clone());

        #[cfg(feature = "local-inference")]
        if let Some(ref classifier) = config.classifier {
            let onnx = crate::providers::OnnxImageClassifier::new(classifier)?;
            self.classifier = Some(Arc::new(onnx));
        }

        #[cfg(not(feature = "local-inference"))]
        if config.classifier.is_some() {
            tracing::warn!(
                "[classifier] section ignored: whatflower was built without `local-inference`"
            );
        }

        Ok(self)
    }

    pub fn build(self) -> Result<ClassifyAndEnrichPipeline> {
        let classifier = self.classifier.ok_or_else(|| {
            WhatFlowerError::Configuration("no image classifier configured".to_string())
        })?;

        let encyclopedia = match self.encyclopedia {
            Some(client) => client,
            None => {
                let config = self.encyclopedia_config.unwrap_or_default();
                Arc::new(WikipediaClient::from_config(&config)?)
            }
        };

        Ok(ClassifyAndEnrichPipeline::new(classifier, encyclopedia))
    }
}
