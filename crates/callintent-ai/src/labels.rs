//! Label encoder: the index ↔ intent-name mapping that accompanies a classifier.
//!
//! Stored as `{"classes": [...]}`, where position `i` holds the name of class
//! index `i`. Names must be unique and non-empty so the mapping is a bijection.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::artifact;
use crate::error::{IntentError, Result};

#[derive(Deserialize)]
struct LabelEncoderFile {
    classes: Vec<String>,
}

/// Bijective mapping between class indices `0..K` and intent names.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Load a label encoder from its JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let file: LabelEncoderFile = artifact::read_json(path)?;
        Self::from_classes(file.classes).map_err(|reason| IntentError::corrupt(path, reason))
    }

    /// Build from class names in index order.
    ///
    /// Returns the reason on failure so callers can attach the artifact path.
    pub fn from_classes(classes: Vec<String>) -> std::result::Result<Self, String> {
        if classes.is_empty() {
            return Err("label encoder has no classes".into());
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (i, name) in classes.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(format!("class {i} has an empty name"));
            }
            if let Some(prev) = index.insert(name.clone(), i) {
                return Err(format!("class name {name:?} appears at both {prev} and {i}"));
            }
        }

        Ok(Self { classes, index })
    }

    /// Number of classes, K.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class name for an index, if the index is in range.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Class index for a name.
    pub fn encode(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All class names in index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}
