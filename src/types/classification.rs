//! Classifier output types.

use serde::{Deserialize, Serialize};

/// One label/confidence pair produced by an image classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Model label, e.g. `"daisy"`.
    pub label: String,
    /// Probability between 0.0 and 1.0.
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Sort classifications by descending confidence.
///
/// The relative order of equal-confidence entries is unspecified. NaN
/// confidences sort last.
pub fn rank(classifications: &mut [Classification]) {
    classifications.sort_unstable_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or_else(|| a.confidence.is_nan().cmp(&b.confidence.is_nan()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_highest_first() {
        let mut items = vec![
            Classification::new("rose", 0.1),
            Classification::new("daisy", 0.7),
            Classification::new("tulip", 0.2),
        ];
        rank(&mut items);
        let labels: Vec<_> = items.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["daisy", "tulip", "rose"]);
    }

    #[test]
    fn rank_puts_nan_last() {
        let mut items = vec![
            Classification::new("broken", f32::NAN),
            Classification::new("daisy", 0.3),
        ];
        rank(&mut items);
        assert_eq!(items[0].label, "daisy");
        assert!(items[1].confidence.is_nan());
    }
}
