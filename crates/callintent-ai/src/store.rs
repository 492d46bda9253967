//! Model store: the classifier and label encoder loaded once at startup.

use std::path::Path;

use callintent_core::ModelConfig;
use tracing::info;

use crate::classifier::{LinearTextClassifier, ProbabilityModel};
use crate::error::{IntentError, Result};
use crate::labels::LabelEncoder;

/// Immutable handle over a classifier and its label encoder.
///
/// Construction guarantees the two artifacts agree on the number of classes,
/// so every index the classifier can produce decodes to a name.
pub struct ModelStore {
    classifier: Box<dyn ProbabilityModel>,
    labels: LabelEncoder,
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore")
            .field("n_classes", &self.classifier.n_classes())
            .field("labels", &self.labels)
            .finish()
    }
}

impl ModelStore {
    /// Load both artifacts from a directory, using the default file names.
    pub fn load(model_dir: &Path) -> Result<Self> {
        Self::load_with(&ModelConfig::in_dir(model_dir))
    }

    /// Load the linear classifier and label encoder named by `config`.
    pub fn load_with(config: &ModelConfig) -> Result<Self> {
        let classifier_path = config.classifier_path();
        let labels_path = config.label_encoder_path();

        let classifier = LinearTextClassifier::load(&classifier_path)?;
        let labels = LabelEncoder::load(&labels_path)?;

        let store = Self::assemble(Box::new(classifier), labels, &config.model_dir)?;
        info!(
            classes = store.n_classes(),
            model_dir = %config.model_dir.display(),
            "loaded intent model"
        );
        Ok(store)
    }

    /// Load a transformer classifier (`model.onnx` + `tokenizer.json`) with the
    /// label encoder named by `config`, both from `config.model_dir`.
    #[cfg(feature = "onnx")]
    pub fn load_onnx(config: &ModelConfig) -> Result<Self> {
        let classifier = crate::transformer::TransformerClassifier::load(&config.model_dir)?;
        let labels = LabelEncoder::load(&config.label_encoder_path())?;

        let store = Self::assemble(Box::new(classifier), labels, &config.model_dir)?;
        info!(
            classes = store.n_classes(),
            model_dir = %config.model_dir.display(),
            "loaded intent model (onnx)"
        );
        Ok(store)
    }

    /// Assemble a store from in-memory artifacts.
    ///
    /// Fails with `ArtifactCorrupt` when the class counts disagree.
    pub fn from_parts(classifier: Box<dyn ProbabilityModel>, labels: LabelEncoder) -> Result<Self> {
        let k = classifier.n_classes();
        if k != labels.len() {
            return Err(IntentError::corrupt(
                "<in-memory>",
                format!(
                    "classifier has {k} classes but label encoder has {}",
                    labels.len()
                ),
            ));
        }
        Ok(Self { classifier, labels })
    }

    /// `from_parts` for loaded artifacts; a mismatch is reported against `model_dir`.
    fn assemble(
        classifier: Box<dyn ProbabilityModel>,
        labels: LabelEncoder,
        model_dir: &Path,
    ) -> Result<Self> {
        Self::from_parts(classifier, labels).map_err(|e| match e {
            IntentError::ArtifactCorrupt { reason, .. } => IntentError::corrupt(model_dir, reason),
            other => other,
        })
    }

    /// Number of classes, K.
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Class probabilities for one text, straight from the classifier.
    pub fn predict_proba(&self, text: &str) -> Result<Vec<f32>> {
        self.classifier.predict_proba(text)
    }

    /// Intent name for a class index.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.labels.decode(index)
    }

    /// Intent names in class-index order.
    pub fn class_names(&self) -> &[String] {
        self.labels.classes()
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }
}
