//! Terminal rendering for predictions and model details.
//!
//! Renders a [`Prediction`] as a short card (intent, confidence, band) with an
//! optional per-class probability breakdown, or as a JSON document.

use std::io::{self, Write};
use std::path::Path;

use callintent_ai::ModelStore;
use callintent_core::{ConfidenceBand, Prediction};
use serde::Serialize;

const LABEL_WIDTH: usize = 12;

pub const EMPTY_INPUT_WARNING: &str = "Please enter some text first.";

#[derive(Serialize)]
struct JsonReport<'a> {
    intent: &'a str,
    confidence: f32,
    band: ConfidenceBand,
    probabilities: Vec<JsonClass<'a>>,
}

#[derive(Serialize)]
struct JsonClass<'a> {
    intent: &'a str,
    probability: f32,
}

/// Write the prediction card; with `class_names`, append the breakdown table.
pub fn write_card(
    out: &mut impl Write,
    prediction: &Prediction,
    class_names: Option<&[String]>,
) -> io::Result<()> {
    writeln!(out, "=== Predicted Intent ===")?;
    writeln!(out, "  {:<LABEL_WIDTH$} {}", "intent", prediction.intent)?;
    writeln!(
        out,
        "  {:<LABEL_WIDTH$} {:.2} ({})",
        "confidence",
        prediction.confidence,
        prediction.band().label()
    )?;

    if let Some(names) = class_names {
        writeln!(out)?;
        writeln!(out, "Probability breakdown")?;
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
        for (i, (name, p)) in prediction.breakdown(names).into_iter().enumerate() {
            let marker = if i == prediction.index { '*' } else { ' ' };
            writeln!(out, "{marker} {name:<width$}  {p:.4}")?;
        }
    }

    writeln!(out)
}

/// Write the prediction as a single JSON document.
pub fn write_json(
    out: &mut impl Write,
    prediction: &Prediction,
    class_names: &[String],
) -> anyhow::Result<()> {
    let report = JsonReport {
        intent: &prediction.intent,
        confidence: prediction.confidence,
        band: prediction.band(),
        probabilities: prediction
            .breakdown(class_names)
            .into_iter()
            .map(|(intent, probability)| JsonClass {
                intent,
                probability,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Write a summary of the loaded model.
pub fn write_model_info(out: &mut impl Write, model_dir: &Path, store: &ModelStore) -> io::Result<()> {
    writeln!(out, "=== Intent Model ===")?;
    writeln!(out, "  {:<LABEL_WIDTH$} {}", "directory", model_dir.display())?;
    writeln!(out, "  {:<LABEL_WIDTH$} {}", "classes", store.n_classes())?;
    for (i, name) in store.class_names().iter().enumerate() {
        writeln!(out, "  {i:>4}  {name}")?;
    }
    Ok(())
}
