//! JSON artifact reading shared by the classifier and label encoder loaders.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{IntentError, Result};

/// Read and deserialize one artifact file.
///
/// I/O failures (missing file, permissions, not a file) are `ArtifactNotFound`;
/// anything that reads but does not parse, truncation included, is `ArtifactCorrupt`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|source| IntentError::ArtifactNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| IntentError::corrupt(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_json::<Sample>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IntentError::ArtifactNotFound { .. }), "{err}");
    }

    #[test]
    fn directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_json::<Sample>(dir.path()).unwrap_err();
        assert!(matches!(err, IntentError::ArtifactNotFound { .. }), "{err}");
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, r#"{"value": 4"#).unwrap();
        let err = read_json::<Sample>(&path).unwrap_err();
        assert!(matches!(err, IntentError::ArtifactCorrupt { .. }), "{err}");
    }

    #[test]
    fn reads_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, r#"{"value": 4}"#).unwrap();
        assert_eq!(read_json::<Sample>(&path).unwrap().value, 4);
    }
}
