//! callintent: classify customer call notes into intents.

mod display;

use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use callintent_ai::{IntentError, IntentPredictor, ModelStore};
use callintent_core::ModelConfig;
use callintent_core::config::{
    DEFAULT_CLASSIFIER_FILE, DEFAULT_LABEL_ENCODER_FILE, DEFAULT_MODEL_DIR,
};
use clap::{Parser, Subcommand, ValueEnum};

use crate::display::EMPTY_INPUT_WARNING;

/// Customer call intent detector
#[derive(Parser)]
#[command(name = "callintent", version, about = "Predict the intent behind customer call notes")]
struct Cli {
    /// Directory holding the classifier and label encoder artifacts
    #[arg(long, env = "CALLINTENT_MODEL_DIR", default_value = DEFAULT_MODEL_DIR, global = true)]
    model_dir: PathBuf,

    /// Classifier artifact file name inside the model directory
    #[arg(long, default_value = DEFAULT_CLASSIFIER_FILE, global = true)]
    classifier_file: String,

    /// Label encoder artifact file name inside the model directory
    #[arg(long, default_value = DEFAULT_LABEL_ENCODER_FILE, global = true)]
    label_encoder_file: String,

    /// Classifier backend
    #[arg(long, value_enum, default_value_t = Backend::Linear, global = true)]
    backend: Backend,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// TF-IDF + logistic regression JSON artifact
    Linear,
    /// Transformer sequence classifier (model.onnx + tokenizer.json)
    #[cfg(feature = "onnx")]
    Onnx,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the intent of one call note
    Predict {
        /// Call notes or transcript (or omit to read from stdin)
        text: Option<String>,
        /// Emit JSON instead of a text card
        #[arg(long)]
        json: bool,
        /// Show the probability of every intent
        #[arg(long)]
        breakdown: bool,
    },

    /// Read call notes line by line from stdin and predict each
    Interactive {
        /// Show the probability of every intent
        #[arg(long)]
        breakdown: bool,
    },

    /// Show the loaded model's intents
    Info,
}

impl Cli {
    fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model_dir: self.model_dir.clone(),
            classifier_file: self.classifier_file.clone(),
            label_encoder_file: self.label_encoder_file.clone(),
        }
    }
}

fn load_store(backend: Backend, config: &ModelConfig) -> Result<ModelStore, IntentError> {
    match backend {
        Backend::Linear => ModelStore::load_with(config),
        #[cfg(feature = "onnx")]
        Backend::Onnx => ModelStore::load_onnx(config),
    }
}

/// What happened to one piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Predicted,
    /// Blank input: warned, predictor not called.
    EmptyInput,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Self::Predicted => ExitCode::SUCCESS,
            Self::EmptyInput => ExitCode::from(2),
        }
    }
}

/// Predict one text and render it to `out`; blank text only warns on `warn`.
fn run_predict(
    predictor: &IntentPredictor,
    text: &str,
    json: bool,
    breakdown: bool,
    out: &mut impl Write,
    warn: &mut impl Write,
) -> anyhow::Result<Outcome> {
    if text.trim().is_empty() {
        writeln!(warn, "warning: {EMPTY_INPUT_WARNING}")?;
        return Ok(Outcome::EmptyInput);
    }

    let prediction = predictor.predict(text)?;
    let names = predictor.store().class_names();
    if json {
        display::write_json(out, &prediction, names)?;
    } else {
        display::write_card(out, &prediction, breakdown.then_some(names))?;
    }
    Ok(Outcome::Predicted)
}

fn main() -> anyhow::Result<ExitCode> {
    // Default: warn for CLI; override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("callintent v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.model_config();
    let store = load_store(cli.backend, &config)
        .with_context(|| format!("loading intent model from {}", config.model_dir.display()))?;
    let predictor = IntentPredictor::new(Arc::new(store));

    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Predict {
            text,
            json,
            breakdown,
        } => {
            let text = match text {
                Some(t) => t,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading call notes from stdin")?;
                    buf
                }
            };

            let outcome =
                run_predict(&predictor, &text, json, breakdown, &mut stdout, &mut io::stderr())?;
            return Ok(outcome.exit_code());
        }

        Command::Interactive { breakdown } => {
            for line in io::stdin().lock().lines() {
                let line = line.context("reading call notes from stdin")?;
                if let Err(e) =
                    run_predict(&predictor, &line, false, breakdown, &mut stdout, &mut io::stderr())
                {
                    eprintln!("error: {e:#}");
                }
            }
        }

        Command::Info => {
            display::write_model_info(&mut stdout, &config.model_dir, predictor.store())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use callintent_ai::{LabelEncoder, ProbabilityModel};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_point_at_bundled_model() {
        let cli = Cli::try_parse_from(["callintent", "info"]).unwrap();
        let config = cli.model_config();
        assert_eq!(config, ModelConfig::default());
        assert!(cli.backend == Backend::Linear);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "callintent",
            "predict",
            "reset my password",
            "--model-dir",
            "/tmp/m",
            "--breakdown",
        ])
        .unwrap();
        assert_eq!(cli.model_dir, PathBuf::from("/tmp/m"));
        match cli.command {
            Command::Predict {
                text,
                json,
                breakdown,
            } => {
                assert_eq!(text.as_deref(), Some("reset my password"));
                assert!(!json);
                assert!(breakdown);
            }
            _ => panic!("expected predict"),
        }
    }

    /// Two-class stub that counts how often it is asked.
    struct CountingModel(Arc<AtomicUsize>);

    impl ProbabilityModel for CountingModel {
        fn n_classes(&self) -> usize {
            2
        }

        fn predict_proba(&self, _text: &str) -> callintent_ai::Result<Vec<f32>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.2, 0.8])
        }
    }

    fn counting_predictor() -> (IntentPredictor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let labels =
            LabelEncoder::from_classes(vec!["billing_inquiry".into(), "password_reset".into()])
                .unwrap();
        let store = ModelStore::from_parts(Box::new(CountingModel(calls.clone())), labels).unwrap();
        (IntentPredictor::new(Arc::new(store)), calls)
    }

    fn bundled_predictor() -> IntentPredictor {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("intent");
        let store = load_store(Backend::Linear, &ModelConfig::in_dir(&dir)).unwrap();
        IntentPredictor::new(Arc::new(store))
    }

    #[test]
    fn blank_input_warns_without_predicting() {
        let (predictor, calls) = counting_predictor();

        for text in ["", "  \n", "\t"] {
            let mut out: Vec<u8> = Vec::new();
            let mut warn: Vec<u8> = Vec::new();
            let outcome = run_predict(&predictor, text, false, true, &mut out, &mut warn).unwrap();

            assert_eq!(outcome, Outcome::EmptyInput);
            assert!(out.is_empty());
            assert_eq!(
                String::from_utf8(warn).unwrap(),
                "warning: Please enter some text first.\n"
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_blank_input_renders_card() {
        let (predictor, calls) = counting_predictor();
        let mut out: Vec<u8> = Vec::new();
        let mut warn: Vec<u8> = Vec::new();

        let outcome =
            run_predict(&predictor, "reset my password", false, false, &mut out, &mut warn).unwrap();

        assert_eq!(outcome, Outcome::Predicted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(warn.is_empty());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("password_reset"), "{text}");
        assert!(text.contains("0.80 (High confidence)"), "{text}");
    }

    #[test]
    fn json_flag_emits_json() {
        let (predictor, _) = counting_predictor();
        let mut out: Vec<u8> = Vec::new();
        run_predict(&predictor, "my bill", true, false, &mut out, &mut Vec::<u8>::new()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["intent"], "password_reset");
        assert_eq!(value["band"], "high");
    }

    #[test]
    fn predicts_with_bundled_model() {
        let predictor = bundled_predictor();

        let prediction = predictor.predict("I want to reset my password").unwrap();
        assert_eq!(prediction.intent, "password_reset");

        let mut buf = Vec::new();
        display::write_card(&mut buf, &prediction, None).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("High confidence"));
    }
}
