//! Per-call prediction result shared between the predictor and front ends.

use serde::{Deserialize, Serialize};

use crate::band::ConfidenceBand;

/// Outcome of classifying one piece of call text.
///
/// `probabilities` is indexed by class index, in the same order as the
/// label encoder's class names. `confidence` is always `probabilities[index]`,
/// which is also the maximum of the vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub intent: String,
    pub index: usize,
    pub confidence: f32,
    pub probabilities: Vec<f32>,
}

impl Prediction {
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }

    /// Pair every probability with its class name, in class-index order.
    ///
    /// `class_names` must come from the same model that produced this prediction.
    pub fn breakdown<'a>(&self, class_names: &'a [String]) -> Vec<(&'a str, f32)> {
        class_names
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
            .collect()
    }
}
