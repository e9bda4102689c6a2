//! Public types for the whatflower API.

mod classification;
mod image;
mod result;
mod state;
mod summary;
mod topic;

pub use classification::{Classification, rank};
pub use self::image::Image;
pub use result::{EnrichedResult, GENERIC_FAILURE_MESSAGE, NO_INFORMATION_PLACEHOLDER, PipelineError};
pub use state::{PipelineState, RunOutcome};
pub use summary::EncyclopediaSummary;
pub use topic::normalize_topic;
