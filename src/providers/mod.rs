//! Classifier and encyclopedia implementations.
//!
//! The Wikipedia client is always available; the ONNX image classifier needs
//! the `local-inference` feature.

#[cfg(feature = "local-inference")]
pub mod onnx_classifier;
pub mod wikipedia;

#[cfg(feature = "local-inference")]
pub use onnx_classifier::OnnxImageClassifier;
pub use wikipedia::WikipediaClient;
