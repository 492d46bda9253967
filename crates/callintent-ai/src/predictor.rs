//! Intent prediction: one text in, one decision-ready [`Prediction`] out.

use std::sync::Arc;

use callintent_core::Prediction;
use tracing::debug;

use crate::error::{IntentError, Result};
use crate::store::ModelStore;

/// Classifies call notes against a shared, read-only [`ModelStore`].
///
/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct IntentPredictor {
    store: Arc<ModelStore>,
}

impl IntentPredictor {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Predict the intent of one piece of text.
    ///
    /// Blank text is rejected with `InvalidInput` before the classifier runs.
    /// The returned probability vector is exactly what the classifier produced.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        if text.trim().is_empty() {
            debug!("rejected blank input");
            return Err(IntentError::InvalidInput("text is empty".into()));
        }

        let probabilities = self.store.predict_proba(text)?;

        let k = self.store.n_classes();
        if probabilities.len() != k {
            return Err(IntentError::InferenceFailure(format!(
                "classifier returned {} probabilities for {k} classes",
                probabilities.len()
            )));
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(IntentError::InferenceFailure(
                "classifier returned a non-finite probability".into(),
            ));
        }

        let index = argmax(&probabilities).ok_or_else(|| {
            IntentError::InferenceFailure("classifier returned no probabilities".into())
        })?;
        let confidence = probabilities[index];
        let intent = self
            .store
            .decode(index)
            .ok_or_else(|| IntentError::InferenceFailure(format!("no label for class {index}")))?
            .to_string();

        let prediction = Prediction {
            intent,
            index,
            confidence,
            probabilities,
        };
        debug!(
            intent = %prediction.intent,
            confidence = prediction.confidence,
            band = %prediction.band(),
            "predicted intent"
        );
        Ok(prediction)
    }
}

/// Index of the largest value; the first one wins on ties.
fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|b| v > values[b]) {
            best = Some(i);
        }
    }
    best
}
