//! Image to tensor conversion and logit post-processing.

use image::imageops::FilterType;

use crate::types::{Classification, Image, rank};
use crate::{Result, WhatFlowerError};

use super::Labels;

/// Normalization applied to each RGB channel after scaling to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Normalization {
    /// ImageNet statistics.
    fn default() -> Self {
        Self {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// Largest square input edge accepted for preprocessing.
pub const MAX_INPUT_SIZE: u32 = 4096;

/// Decode `image`, resize it to `size`x`size` and lay it out as a normalized
/// NCHW `f32` tensor of shape `[1, 3, size, size]`.
pub fn image_to_tensor(image: &Image, size: u32, norm: &Normalization) -> Result<Vec<f32>> {
    if size == 0 || size > MAX_INPUT_SIZE {
        return Err(WhatFlowerError::Model(format!(
            "Model input size must be between 1 and {MAX_INPUT_SIZE}, got {size}"
        )));
    }
    if norm.std.iter().any(|s| *s == 0.0) {
        return Err(WhatFlowerError::Model(
            "Normalization std must be non-zero".to_string(),
        ));
    }

    let decoded = image::load_from_memory(image.as_bytes())
        .map_err(|e| WhatFlowerError::Model(format!("Failed to decode image: {e}")))?;
    let rgb = decoded
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgb8();

    let edge = size as usize;
    let plane = edge * edge;
    let mut tensor = vec![0.0f32; 3 * plane];
    for (i, pixel) in rgb.pixels().enumerate() {
        for c in 0..3 {
            let value = f32::from(pixel[c]) / 255.0;
            tensor[c * plane + i] = (value - norm.mean[c]) / norm.std[c];
        }
    }

    Ok(tensor)
}

/// Softmax function.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Turn raw logits into the `top_k` most likely labels, highest first.
pub fn logits_to_classifications(
    logits: &[f32],
    labels: &Labels,
    top_k: usize,
) -> Result<Vec<Classification>> {
    if logits.len() != labels.len() {
        return Err(WhatFlowerError::Model(format!(
            "Model produced {} scores but {} labels are configured",
            logits.len(),
            labels.len()
        )));
    }

    let mut classifications: Vec<Classification> = softmax(logits)
        .into_iter()
        .zip(labels.iter())
        .map(|(confidence, label)| Classification::new(label, confidence))
        .collect();
    rank(&mut classifications);
    classifications.truncate(top_k);

    Ok(classifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Image {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb(color));
        let mut bytes = Vec::new();
        buffer
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Image::from_bytes(bytes)
    }

    #[test]
    fn test_softmax() {
        let probs = softmax(&[1.0, 2.0, 3.0]);

        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1]);
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_large_logits_stay_finite() {
        let probs = softmax(&[1000.0, 999.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn tensor_has_nchw_shape() {
        let image = solid_png(10, 6, [255, 0, 0]);
        let tensor = image_to_tensor(&image, 4, &Normalization::default()).unwrap();
        assert_eq!(tensor.len(), 3 * 4 * 4);
    }

    #[test]
    fn tensor_is_normalized_per_channel() {
        let image = solid_png(8, 8, [255, 0, 255]);
        let norm = Normalization {
            mean: [0.5, 0.5, 0.5],
            std: [0.5, 0.5, 0.5],
        };
        let tensor = image_to_tensor(&image, 2, &norm).unwrap();
        let plane = 4;
        // Red and blue saturated, green empty.
        assert!(tensor[..plane].iter().all(|v| (v - 1.0).abs() < 1e-2));
        assert!(tensor[plane..2 * plane].iter().all(|v| (v + 1.0).abs() < 1e-2));
        assert!(tensor[2 * plane..].iter().all(|v| (v - 1.0).abs() < 1e-2));
    }

    #[test]
    fn oversized_input_is_model_error() {
        let image = solid_png(2, 2, [0, 0, 0]);
        let err = image_to_tensor(&image, 70_000, &Normalization::default()).unwrap_err();
        assert!(matches!(err, WhatFlowerError::Model(_)));
    }

    #[test]
    fn undecodable_bytes_are_model_error() {
        let image = Image::from_bytes(b"definitely not an image".to_vec());
        let err = image_to_tensor(&image, 4, &Normalization::default()).unwrap_err();
        assert!(matches!(err, WhatFlowerError::Model(_)));
    }

    #[test]
    fn logits_rank_and_truncate() {
        let labels: Labels = ["daisy", "dandelion", "rose", "sunflower"].into_iter().collect();
        let result = logits_to_classifications(&[0.5, 3.0, -1.0, 1.0], &labels, 2).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].label, "dandelion");
        assert_eq!(result[1].label, "sunflower");
        assert!(result[0].confidence > result[1].confidence);
        assert!(result[0].confidence <= 1.0);
    }

    #[test]
    fn logits_label_count_mismatch_is_model_error() {
        let labels: Labels = ["daisy", "rose"].into_iter().collect();
        let err = logits_to_classifications(&[0.1, 0.2, 0.3], &labels, 5).unwrap_err();
        assert!(matches!(err, WhatFlowerError::Model(_)));
    }
}
