//! Local model loading support.

pub mod device;
pub mod labels;
pub mod preprocess;

pub use device::Device;
pub use labels::Labels;
pub use preprocess::Normalization;
