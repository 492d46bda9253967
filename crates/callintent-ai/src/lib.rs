//! Intent inference: model artifacts, the model store, and the predictor.

mod artifact;
mod classifier;
mod error;
mod labels;
mod predictor;
mod store;
#[cfg(feature = "onnx")]
mod transformer;

pub use classifier::{
    LinearTextClassifier, LogisticHead, MultiClass, Norm, ProbabilityModel, TfidfVectorizer,
};
pub use error::{IntentError, Result};
pub use labels::LabelEncoder;
pub use predictor::IntentPredictor;
pub use store::ModelStore;
#[cfg(feature = "onnx")]
pub use transformer::TransformerClassifier;
