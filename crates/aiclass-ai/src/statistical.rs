//! Contract for the statistical text classifier the engine consults first.
//!
//! The engine never depends on a concrete model: anything that maps text to a
//! `(category_id, confidence)` pair can be plugged in. Failures split into
//! acquisition failures ([`ModelUnavailable`]), which put the engine into
//! keyword-only mode for good, and per-call failures ([`InferenceError`]),
//! which only affect the current call.

use aiclass_core::{Category, ClassificationResult, Method};
use thiserror::Error;

/// Raw output of a statistical classifier, before range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub category_id: i64,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(category_id: i64, confidence: f32) -> Self {
        Self {
            category_id,
            confidence,
        }
    }

    /// Check the prediction against the category table and confidence range.
    pub fn validate(self) -> Result<ClassificationResult, InferenceError> {
        let category = Category::try_from(self.category_id)
            .map_err(|e| InferenceError::InvalidOutput(e.to_string()))?;
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(InferenceError::InvalidOutput(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }
        Ok(ClassificationResult::new(
            category,
            self.confidence,
            Method::Statistical,
        ))
    }
}

/// The statistical model could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("statistical model unavailable: {0}")]
pub struct ModelUnavailable(pub String);

/// A single prediction failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("inference backend: {0}")]
    Backend(String),

    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    #[error("model lock poisoned by an earlier panic")]
    Poisoned,

    #[error("statistical classifier panicked")]
    Panicked,
}

/// A text classifier producing a category id and a confidence in `[0, 1]`.
///
/// Implementations must be shareable across threads; a backend that needs
/// exclusive access per call serialises internally.
pub trait StatisticalClassifier: Send + Sync {
    fn predict(&self, text: &str) -> Result<Prediction, InferenceError>;

    fn model_name(&self) -> &str;

    /// Release model resources. Called once by the engine on cleanup.
    fn release(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_in_range() {
        let r = Prediction::new(2, 0.9).validate().unwrap();
        assert_eq!(r.category, Category::GenerativeAi);
        assert_eq!(r.confidence, 0.9);
        assert_eq!(r.method, Method::Statistical);
    }

    #[test]
    fn validate_accepts_bounds() {
        assert!(Prediction::new(0, 0.0).validate().is_ok());
        assert!(Prediction::new(7, 1.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_category() {
        let err = Prediction::new(8, 0.5).validate().unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutput(_)));
        let err = Prediction::new(-3, 0.5).validate().unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutput(_)));
    }

    #[test]
    fn validate_rejects_bad_confidence() {
        assert!(Prediction::new(1, 1.5).validate().is_err());
        assert!(Prediction::new(1, -0.1).validate().is_err());
        assert!(Prediction::new(1, f32::NAN).validate().is_err());
    }
}
