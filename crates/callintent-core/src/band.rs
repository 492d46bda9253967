//! Confidence banding for intent predictions.
//!
//! A prediction's confidence (its maximum class probability) falls into one
//! of three ordered bands. Each band includes its lower bound and excludes
//! its upper bound, so every value in `[0, 1]` maps to exactly one band.

use serde::{Deserialize, Serialize};

/// Lowest confidence that counts as [`ConfidenceBand::High`].
///
/// Confidences are `f32`, so the comparison happens at single precision: a
/// probability computed in `f64` just below 0.65 may round to exactly this
/// value and band as High.
pub const HIGH_THRESHOLD: f32 = 0.65;

/// Lowest confidence that counts as [`ConfidenceBand::Moderate`].
pub const MODERATE_THRESHOLD: f32 = 0.40;

/// Ordered confidence categories, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Low,
    Moderate,
    High,
}

impl ConfidenceBand {
    /// Classify a confidence value.
    ///
    /// Values below zero (and NaN) land in `Low`; values above one land in `High`.
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= HIGH_THRESHOLD {
            Self::High
        } else if confidence >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Human-readable label, e.g. `"High confidence"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low confidence",
            Self::Moderate => "Moderate confidence",
            Self::High => "High confidence",
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_lower_inclusive() {
        assert_eq!(ConfidenceBand::from_confidence(0.0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(0.399999), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(0.40), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::from_confidence(0.649999), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::from_confidence(0.65), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(1.0), ConfidenceBand::High);
    }

    #[test]
    fn adjacent_f32_values_split_at_thresholds() {
        let below = |t: f32| f32::from_bits(t.to_bits() - 1);
        assert_eq!(ConfidenceBand::from_confidence(below(HIGH_THRESHOLD)), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::from_confidence(HIGH_THRESHOLD), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(below(MODERATE_THRESHOLD)), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(MODERATE_THRESHOLD), ConfidenceBand::Moderate);
        // 0.649_999_999_9 has no f32 of its own and rounds up to the threshold.
        assert_eq!(ConfidenceBand::from_confidence(0.649_999_999_9_f64 as f32), ConfidenceBand::High);
    }

    #[test]
    fn total_over_unit_interval() {
        // Walk [0, 1] in small steps; bands must never decrease.
        let mut prev = ConfidenceBand::Low;
        for step in 0..=10_000 {
            let c = step as f32 / 10_000.0;
            let band = ConfidenceBand::from_confidence(c);
            assert!(band >= prev, "band went down at {c}");
            prev = band;
        }
        assert_eq!(prev, ConfidenceBand::High);
    }

    #[test]
    fn nan_is_low() {
        assert_eq!(ConfidenceBand::from_confidence(f32::NAN), ConfidenceBand::Low);
    }

    #[test]
    fn labels() {
        assert_eq!(ConfidenceBand::High.label(), "High confidence");
        assert_eq!(ConfidenceBand::Moderate.label(), "Moderate confidence");
        assert_eq!(ConfidenceBand::Low.label(), "Low confidence");
        assert_eq!(ConfidenceBand::Moderate.to_string(), "moderate");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ConfidenceBand::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
