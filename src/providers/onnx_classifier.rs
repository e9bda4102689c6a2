//! Local image classification via ONNX Runtime.
//!
//! Works with any single-input image model that emits one logit per class
//! (MobileNet/ResNet/EfficientNet style exports fine-tuned on flowers).

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use tracing::{debug, info, instrument};

use crate::config::ClassifierConfig;
use crate::model::preprocess::{image_to_tensor, logits_to_classifications};
use crate::model::{Device, Labels, Normalization};
use crate::traits::ImageClassifier;
use crate::types::{Classification, Image};
use crate::{Result, WhatFlowerError};

/// Local image classifier using ONNX Runtime.
///
/// The session is created once in [`OnnxImageClassifier::new`] and shared by
/// every `classify` call. Runs are serialized on the session mutex and
/// executed on tokio's blocking pool.
pub struct OnnxImageClassifier {
    session: Arc<Mutex<Session>>,
    labels: Arc<Labels>,
    model_name: String,
    input_name: String,
    input_size: u32,
    normalization: Normalization,
    top_k: usize,
}

impl OnnxImageClassifier {
    /// Load the model and labels described by `config`.
    ///
    /// Any load failure is reported as [`WhatFlowerError::Model`].
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let device = config.device()?;
        let labels = Labels::load(&config.labels_path)?;
        let session = build_session(&config.model_path, &device)?;

        let model_name = config
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx")
            .to_string();

        info!(
            model = %model_name,
            labels = labels.len(),
            device = device.name(),
            "image classifier loaded"
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            labels: Arc::new(labels),
            model_name,
            input_name: config.input_name.clone(),
            input_size: config.input_size,
            normalization: config.normalization(),
            top_k: config.top_k.max(1),
        })
    }

    fn job(&self) -> InferenceJob {
        InferenceJob {
            session: Arc::clone(&self.session),
            labels: Arc::clone(&self.labels),
            input_name: self.input_name.clone(),
            input_size: self.input_size,
            normalization: self.normalization,
            top_k: self.top_k,
        }
    }
}

/// Everything one inference needs, owned so it can move to the blocking pool.
struct InferenceJob {
    session: Arc<Mutex<Session>>,
    labels: Arc<Labels>,
    input_name: String,
    input_size: u32,
    normalization: Normalization,
    top_k: usize,
}

impl InferenceJob {
    fn run(&self, image: &Image) -> Result<Vec<Classification>> {
        let tensor = image_to_tensor(image, self.input_size, &self.normalization)?;
        let logits = self.run_inference(&tensor)?;
        logits_to_classifications(&logits, &self.labels, self.top_k)
    }

    /// Run the ONNX session and return the flattened logits.
    fn run_inference(&self, tensor: &[f32]) -> Result<Vec<f32>> {
        use ort::value::TensorRef;

        let edge = self.input_size as usize;
        let shape = [1_usize, 3, edge, edge];

        // ort v2 expects (shape, slice)
        let input = TensorRef::from_array_view((shape, tensor)).map_err(|e| {
            WhatFlowerError::Model(format!("Failed to create input tensor: {e}"))
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| WhatFlowerError::Model(format!("Failed to acquire session lock: {e}")))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| WhatFlowerError::Model(format!("ONNX inference failed: {e}")))?;

        // Single output of shape [1, num_classes]
        let (_shape, logits) = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            WhatFlowerError::Model(format!("Failed to extract logits: {e}"))
        })?;

        Ok(logits.to_vec())
    }
}

#[async_trait]
impl ImageClassifier for OnnxImageClassifier {
    fn name(&self) -> &str {
        &self.model_name
    }

    #[instrument(skip_all, fields(classifier = %self.model_name, bytes = image.len()))]
    async fn classify(&self, image: &Image) -> Result<Vec<Classification>> {
        let job = self.job();
        let image = image.clone();

        let classifications = tokio::task::spawn_blocking(move || job.run(&image))
            .await
            .map_err(|e| WhatFlowerError::Model(format!("Inference task failed: {e}")))??;

        if let Some(top) = classifications.first() {
            debug!(label = %top.label, confidence = top.confidence, "top classification");
        }
        Ok(classifications)
    }
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| WhatFlowerError::Model(format!("Failed to create session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| WhatFlowerError::Model(format!("Failed to set optimization level: {e}")))?;

    // Configure execution provider based on device
    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| WhatFlowerError::Model(format!("Failed to configure CUDA: {e}")))?
        }
    };

    builder.commit_from_file(model_path).map_err(|e| {
        WhatFlowerError::Model(format!("Failed to load ONNX model {model_path:?}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_labels_file_is_model_error() {
        let config = ClassifierConfig::new("/nonexistent/flowers.onnx", "/nonexistent/flowers.txt");
        let err = OnnxImageClassifier::new(&config).err().unwrap();
        assert!(matches!(err, WhatFlowerError::Model(_)));
    }

    #[test]
    fn missing_model_file_is_model_error() {
        let dir = tempfile::tempdir().unwrap();
        let labels_path = dir.path().join("flowers.txt");
        std::fs::write(&labels_path, "daisy\nrose\n").unwrap();

        let config = ClassifierConfig::new(dir.path().join("missing.onnx"), labels_path);
        let err = OnnxImageClassifier::new(&config).err().unwrap();
        assert!(matches!(err, WhatFlowerError::Model(_)));
    }

    #[test]
    fn corrupt_model_file_is_model_error() {
        let dir = tempfile::tempdir().unwrap();
        let labels_path = dir.path().join("flowers.txt");
        let model_path = dir.path().join("flowers.onnx");
        std::fs::write(&labels_path, "daisy\nrose\n").unwrap();
        std::fs::write(&model_path, b"not a protobuf").unwrap();

        let config = ClassifierConfig::new(model_path, labels_path);
        let err = OnnxImageClassifier::new(&config).err().unwrap();
        assert!(matches!(err, WhatFlowerError::Model(_)));
    }
}
