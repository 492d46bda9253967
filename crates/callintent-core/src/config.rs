//! Model location configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_DIR: &str = "models/intent";
pub const DEFAULT_CLASSIFIER_FILE: &str = "intent_classifier.json";
pub const DEFAULT_LABEL_ENCODER_FILE: &str = "intent_label_encoder.json";

/// Where the classifier and label encoder artifacts live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
    pub classifier_file: String,
    pub label_encoder_file: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            classifier_file: DEFAULT_CLASSIFIER_FILE.to_string(),
            label_encoder_file: DEFAULT_LABEL_ENCODER_FILE.to_string(),
        }
    }
}

impl ModelConfig {
    /// Default file names inside `model_dir`.
    pub fn in_dir(model_dir: impl AsRef<Path>) -> Self {
        Self {
            model_dir: model_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.model_dir.join(&self.classifier_file)
    }

    pub fn label_encoder_path(&self) -> PathBuf {
        self.model_dir.join(&self.label_encoder_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let cfg = ModelConfig::default();
        assert_eq!(
            cfg.classifier_path(),
            PathBuf::from("models/intent/intent_classifier.json")
        );
        assert_eq!(
            cfg.label_encoder_path(),
            PathBuf::from("models/intent/intent_label_encoder.json")
        );
    }

    #[test]
    fn in_dir_keeps_default_file_names() {
        let cfg = ModelConfig::in_dir("/opt/models");
        assert_eq!(cfg.model_dir, PathBuf::from("/opt/models"));
        assert_eq!(cfg.classifier_file, DEFAULT_CLASSIFIER_FILE);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ModelConfig = serde_json::from_str(r#"{"model_dir": "/srv/intent"}"#).unwrap();
        assert_eq!(cfg.model_dir, PathBuf::from("/srv/intent"));
        assert_eq!(cfg.label_encoder_file, DEFAULT_LABEL_ENCODER_FILE);
    }
}
