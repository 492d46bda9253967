use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("model artifact not found or unreadable: {}", .path.display())]
    ArtifactNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact is corrupt: {}: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    InferenceFailure(String),
}

impl IntentError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Startup errors: the process must not go on to serve predictions.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ArtifactNotFound { .. } | Self::ArtifactCorrupt { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IntentError>;
