//! Pipeline progress states.

use serde::{Deserialize, Serialize};

/// Where a pipeline run currently is.
///
/// `Idle -> Classifying -> Enriching -> Done`; a run that fails during
/// classification goes straight from `Classifying` to `Done(Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Idle,
    Classifying,
    Enriching,
    Done(RunOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed,
}

impl PipelineState {
    /// Whether a run is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Classifying | Self::Enriching)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stages_are_busy() {
        assert!(PipelineState::Classifying.is_busy());
        assert!(PipelineState::Enriching.is_busy());
        assert!(!PipelineState::Idle.is_busy());
        assert!(!PipelineState::Done(RunOutcome::Failed).is_busy());
    }

    #[test]
    fn done_covers_both_outcomes() {
        assert!(PipelineState::Done(RunOutcome::Succeeded).is_done());
        assert!(PipelineState::Done(RunOutcome::Failed).is_done());
        assert!(!PipelineState::default().is_done());
    }
}
