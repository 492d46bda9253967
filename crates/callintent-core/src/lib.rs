//! Core types and shared configuration for call intent detection.

pub mod band;
pub mod config;
pub mod prediction;

pub use band::ConfidenceBand;
pub use config::ModelConfig;
pub use prediction::Prediction;
