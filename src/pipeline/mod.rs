//! Classify-then-enrich pipeline.
//!
//! One [`run`](ClassifyAndEnrichPipeline::run) classifies an image, takes the
//! top label, looks it up in the encyclopedia and folds both outcomes into an
//! [`EnrichedResult`]. Steps are strictly sequential and nothing is retried.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! # use whatflower::{ClassifyAndEnrichPipeline, Image, ImageClassifier, WikipediaClient};
//!
//! # async fn example(classifier: Arc<dyn ImageClassifier>) -> whatflower::Result<()> {
//! let pipeline = ClassifyAndEnrichPipeline::new(classifier, Arc::new(WikipediaClient::new()?));
//! let result = pipeline.run(&Image::open("daisy.jpg")?).await;
//! println!("{}: {}", result.display_title(), result.message());
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::PipelineBuilder;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ErrorKind;
use crate::telemetry;
use crate::traits::{EncyclopediaClient, ImageClassifier};
use crate::types::{
    EnrichedResult, Image, NO_INFORMATION_PLACEHOLDER, PipelineError, PipelineState, RunOutcome,
    normalize_topic,
};
use crate::{Result, WhatFlowerError};

/// Orchestrates one classifier and one encyclopedia client.
///
/// Concurrent runs on the same instance are serialized: each run holds the
/// run lock from `Classifying` until `Done`, so observers of
/// [`subscribe`](Self::subscribe) never see two runs interleave.
pub struct ClassifyAndEnrichPipeline {
    classifier: Arc<dyn ImageClassifier>,
    encyclopedia: Arc<dyn EncyclopediaClient>,
    run_lock: Mutex<()>,
    state: watch::Sender<PipelineState>,
}

impl ClassifyAndEnrichPipeline {
    pub fn new(
        classifier: Arc<dyn ImageClassifier>,
        encyclopedia: Arc<dyn EncyclopediaClient>,
    ) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            classifier,
            encyclopedia,
            run_lock: Mutex::new(()),
            state,
        }
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Current state of the pipeline.
    pub fn state(&self) -> PipelineState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn classifier(&self) -> &Arc<dyn ImageClassifier> {
        &self.classifier
    }

    pub fn encyclopedia(&self) -> &Arc<dyn EncyclopediaClient> {
        &self.encyclopedia
    }

    /// Classify `image` and enrich the top label.
    ///
    /// Never fails: classifier and encyclopedia errors are reported in
    /// [`EnrichedResult::error`].
    pub async fn run(&self, image: &Image) -> EnrichedResult {
        let never = CancellationToken::new();
        match self.run_with_cancel(image, &never).await {
            Ok(result) => result,
            // Only cancellation is reported as `Err`.
            Err(e) => EnrichedResult::failure(
                String::new(),
                None,
                PipelineError::from_error(&e, ErrorKind::Model),
            ),
        }
    }

    /// Like [`run`](Self::run), but abandons the run if `cancel` fires.
    ///
    /// The token is checked before classification and again before the
    /// encyclopedia lookup; an inference already in flight is allowed to
    /// finish. A cancelled run returns [`WhatFlowerError::Cancelled`] and
    /// leaves the pipeline `Idle`. Dropping the returned future mid-run also
    /// leaves the pipeline `Idle`.
    #[instrument(skip_all, fields(
        classifier = self.classifier.name(),
        encyclopedia = self.encyclopedia.name(),
    ))]
    pub async fn run_with_cancel(
        &self,
        image: &Image,
        cancel: &CancellationToken,
    ) -> Result<EnrichedResult> {
        let _lock = self.run_lock.lock().await;
        let started = Instant::now();
        // Publishes `Idle` if this run ends without reaching `finish`,
        // including when the caller drops the future mid-run.
        let abandoned = AbandonedRun::new(&self.state);

        bail_if_cancelled(cancel)?;
        self.state.send_replace(PipelineState::Classifying);

        let stage = Instant::now();
        let classified = self.classifier.classify(image).await;
        record_stage("classify", stage);

        let top = match classified {
            Ok(classifications) => classifications
                .into_iter()
                .next()
                .filter(|top| !top.label.trim().is_empty())
                .ok_or_else(|| {
                    PipelineError::new(ErrorKind::Model, "classifier returned no usable label")
                }),
            Err(e) => Err(PipelineError::from_error(&e, ErrorKind::Model)),
        };
        let top = match top {
            Ok(top) => top,
            Err(error) => {
                abandoned.disarm();
                return Ok(self.finish(started, EnrichedResult::failure("", None, error)));
            }
        };
        debug!(label = %top.label, confidence = top.confidence, "classified");

        // No confidence gate: the top label is looked up however unsure the
        // classifier was.
        bail_if_cancelled(cancel)?;
        self.state.send_replace(PipelineState::Enriching);

        let stage = Instant::now();
        let looked_up = self.encyclopedia.lookup(&top.label).await;
        record_stage("enrich", stage);

        let result = match looked_up {
            Ok(mut summary) => {
                if !summary.has_extract() {
                    summary.extract = NO_INFORMATION_PLACEHOLDER.to_string();
                }
                let label = if summary.is_found() {
                    normalize_topic(&top.label)
                } else {
                    top.label
                };
                EnrichedResult::success(label, top.confidence, summary)
            }
            Err(e) => EnrichedResult::failure(
                top.label,
                Some(top.confidence),
                PipelineError::from_error(&e, ErrorKind::Network),
            ),
        };

        abandoned.disarm();
        Ok(self.finish(started, result))
    }

    /// Publish the terminal state and record run metrics.
    fn finish(&self, started: Instant, result: EnrichedResult) -> EnrichedResult {
        let (outcome, status) = match &result.error {
            None => (RunOutcome::Succeeded, "ok"),
            Some(error) => {
                warn!(kind = %error.kind, detail = %error.detail, label = %result.label, "pipeline run failed");
                let status = match error.kind {
                    ErrorKind::Model => "model_error",
                    ErrorKind::Network => "network_error",
                    ErrorKind::Parse => "parse_error",
                };
                (RunOutcome::Failed, status)
            }
        };

        metrics::counter!(telemetry::RUNS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::RUN_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        self.state.send_replace(PipelineState::Done(outcome));
        result
    }
}

fn bail_if_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(WhatFlowerError::Cancelled);
    }
    Ok(())
}

/// Resets the state to `Idle` when a run stops before producing a result.
///
/// Covers both token cancellation and the run future being dropped.
struct AbandonedRun<'a> {
    state: &'a watch::Sender<PipelineState>,
    armed: bool,
}

impl<'a> AbandonedRun<'a> {
    fn new(state: &'a watch::Sender<PipelineState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonedRun<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        info!("pipeline run cancelled");
        metrics::counter!(telemetry::RUNS_CANCELLED_TOTAL).increment(1);
        self.state.send_replace(PipelineState::Idle);
    }
}

fn record_stage(stage: &'static str, start: Instant) {
    metrics::histogram!(telemetry::STAGE_DURATION_SECONDS, "stage" => stage)
        .record(start.elapsed().as_secs_f64());
}
