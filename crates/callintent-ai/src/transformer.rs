//! ONNX Runtime sequence classifier for fine-tuned transformer models.
//!
//! The model directory must contain `model.onnx` and `tokenizer.json`. The
//! model takes BERT-style `input_ids`, `attention_mask`, and `token_type_ids`
//! and returns logits shaped `[batch, K]`.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::classifier::{ProbabilityModel, softmax};
use crate::error::{IntentError, Result};

const MAX_LENGTH: usize = 256;

/// Transformer text classifier running under ONNX Runtime.
///
/// The session needs exclusive access per run, so it sits behind a mutex.
pub struct TransformerClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    n_classes: usize,
}

impl TransformerClassifier {
    /// Load a classifier from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        for path in [&model_path, &tokenizer_path] {
            std::fs::metadata(path).map_err(|source| IntentError::ArtifactNotFound {
                path: path.clone(),
                source,
            })?;
        }

        let session = open_session(&model_path)
            .map_err(|e| IntentError::corrupt(&model_path, format!("{e:#}")))?;

        let n_classes = class_count(
            &model_path,
            session.outputs().first().map(|output| output.dtype()),
        )?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| IntentError::corrupt(&tokenizer_path, format!("load tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| IntentError::corrupt(&tokenizer_path, format!("set truncation: {e}")))?;

        info!(classes = n_classes, model = %model_path.display(), "loaded transformer classifier");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            n_classes,
        })
    }

    fn logits(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();

        let shape = [1i64, input_ids.len() as i64];
        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;
        let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;

        anyhow::ensure!(!outputs.is_empty(), "model produced no outputs");
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] == 1 && dims[1] as usize == self.n_classes,
            "unexpected output shape: {dims:?}, expected [1, {}]",
            self.n_classes
        );

        Ok(output_data.to_vec())
    }
}

impl ProbabilityModel for TransformerClassifier {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f32>> {
        let logits = self
            .logits(text)
            .map_err(|e| IntentError::InferenceFailure(format!("{e:#}")))?;
        Ok(softmax(&logits))
    }
}

fn open_session(model_path: &Path) -> anyhow::Result<Session> {
    Ok(Session::builder()?.commit_from_file(model_path)?)
}

/// Class count of the first (logits) output; a graph without outputs is corrupt.
fn class_count(model_path: &Path, logits: Option<&ort::value::ValueType>) -> Result<usize> {
    let logits = logits.ok_or_else(|| IntentError::corrupt(model_path, "model has no outputs"))?;
    infer_classes(logits).ok_or_else(|| {
        IntentError::corrupt(model_path, "logits output has no static class dimension")
    })
}

/// Read the class count from the static last dimension of the logits output.
fn infer_classes(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
