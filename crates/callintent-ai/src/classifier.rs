//! Text classifiers that turn a call note into class probabilities.
//!
//! [`ProbabilityModel`] is the seam between the model store and whatever
//! produced the probabilities. The built-in implementation is
//! [`LinearTextClassifier`]: a fitted TF-IDF vectorizer followed by a
//! logistic-regression head, both read from one JSON artifact.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::artifact;
use crate::error::{IntentError, Result};

/// A trained classifier producing a probability distribution over `K` classes.
///
/// Implementations must be safe to call from many threads at once; the model
/// store shares one instance across every prediction.
pub trait ProbabilityModel: Send + Sync {
    /// Number of classes, K.
    fn n_classes(&self) -> usize;

    /// Probabilities for one text, length `n_classes()`, summing to 1.
    fn predict_proba(&self, text: &str) -> Result<Vec<f32>>;
}

/// Row normalisation applied to TF-IDF vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// How decision values become probabilities when there are 3+ classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    /// Softmax over all decision values.
    #[default]
    Multinomial,
    /// Independent sigmoid per class, then rescaled to sum to 1.
    Ovr,
}

/// Fitted TF-IDF vectorizer parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    /// term → feature index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index.
    pub idf: Vec<f32>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    /// Inclusive (min, max) word n-gram lengths.
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

/// Fitted logistic-regression head.
///
/// `coef` has one row per class, or a single row for a binary model.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticHead {
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
    #[serde(default)]
    pub multi_class: MultiClass,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

#[derive(Deserialize)]
struct ClassifierFile {
    vectorizer: TfidfVectorizer,
    head: LogisticHead,
}

/// TF-IDF + logistic regression text classifier.
#[derive(Debug, Clone)]
pub struct LinearTextClassifier {
    vectorizer: TfidfVectorizer,
    head: LogisticHead,
    n_classes: usize,
}

impl LinearTextClassifier {
    /// Load a classifier from its JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let file: ClassifierFile = artifact::read_json(path)?;
        let clf = Self::new(file.vectorizer, file.head)
            .map_err(|reason| IntentError::corrupt(path, reason))?;

        info!(
            classes = clf.n_classes,
            features = clf.vectorizer.idf.len(),
            model = %path.display(),
            "loaded linear text classifier"
        );
        Ok(clf)
    }

    /// Validate fitted parameters and build a classifier.
    pub fn new(
        vectorizer: TfidfVectorizer,
        head: LogisticHead,
    ) -> std::result::Result<Self, String> {
        let n_features = vectorizer.idf.len();

        if vectorizer.vocabulary.is_empty() {
            return Err("vectorizer vocabulary is empty".into());
        }
        if let Some((term, &idx)) = vectorizer.vocabulary.iter().find(|(_, i)| **i >= n_features) {
            return Err(format!(
                "term {term:?} maps to feature {idx}, but idf has {n_features} entries"
            ));
        }
        if vectorizer.idf.iter().any(|v| !v.is_finite()) {
            return Err("idf contains a non-finite value".into());
        }
        let (min_n, max_n) = vectorizer.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        if head.coef.is_empty() {
            return Err("coef has no rows".into());
        }
        if head.intercept.len() != head.coef.len() {
            return Err(format!(
                "intercept has {} entries for {} coef rows",
                head.intercept.len(),
                head.coef.len()
            ));
        }
        for (k, row) in head.coef.iter().enumerate() {
            if row.len() != n_features {
                return Err(format!(
                    "coef row {k} has {} weights, expected {n_features}",
                    row.len()
                ));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(format!("coef row {k} contains a non-finite value"));
            }
        }
        if head.intercept.iter().any(|v| !v.is_finite()) {
            return Err("intercept contains a non-finite value".into());
        }

        // One coefficient row encodes a two-class model.
        let n_classes = if head.coef.len() == 1 { 2 } else { head.coef.len() };

        Ok(Self {
            vectorizer,
            head,
            n_classes,
        })
    }

    /// Sparse TF-IDF vector for `text`: `(feature index, weight)` pairs.
    fn transform(&self, text: &str) -> Vec<(usize, f32)> {
        let v = &self.vectorizer;
        let lowered;
        let text = if v.lowercase {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        let tokens = tokenize(text);
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in word_ngrams(&tokens, v.ngram_range) {
            if let Some(&idx) = v.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut features: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if v.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * v.idf[idx])
            })
            .collect();
        features.sort_unstable_by_key(|&(idx, _)| idx);

        match v.norm {
            Some(Norm::L2) => {
                let norm: f32 = features.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
                scale(&mut features, norm);
            }
            Some(Norm::L1) => {
                let norm: f32 = features.iter().map(|(_, w)| w.abs()).sum();
                scale(&mut features, norm);
            }
            None => {}
        }

        features
    }

    fn decision_function(&self, features: &[(usize, f32)]) -> Vec<f32> {
        self.head
            .coef
            .iter()
            .zip(&self.head.intercept)
            .map(|(row, b)| features.iter().map(|&(idx, w)| row[idx] * w).sum::<f32>() + b)
            .collect()
    }
}

impl ProbabilityModel for LinearTextClassifier {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f32>> {
        let features = self.transform(text);
        let scores = self.decision_function(&features);

        let probs = if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            match self.head.multi_class {
                MultiClass::Multinomial => softmax(&scores),
                MultiClass::Ovr => {
                    let mut p: Vec<f32> = scores.iter().map(|&z| sigmoid(z)).collect();
                    let total: f32 = p.iter().sum();
                    if total > 0.0 {
                        for x in &mut p {
                            *x /= total;
                        }
                    }
                    p
                }
            }
        };

        if probs.iter().any(|p| !p.is_finite()) {
            return Err(IntentError::InferenceFailure(
                "classifier produced a non-finite probability".into(),
            ));
        }
        Ok(probs)
    }
}

// ── Text processing ──

/// Split into word tokens of two or more word characters.
fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().nth(1).is_some())
        .collect()
}

/// Space-joined word n-grams for every length in `range`.
fn word_ngrams(tokens: &[&str], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut out = Vec::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}

fn scale(features: &mut [(usize, f32)], norm: f32) {
    if norm > 0.0 {
        for (_, w) in features.iter_mut() {
            *w /= norm;
        }
    }
}

// ── Probability helpers ──

/// Numerically stable softmax.
pub(crate) fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}
