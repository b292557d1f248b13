//! The value produced for every classified snippet.

use serde::{Deserialize, Serialize};

use crate::Category;

/// Which scorer produced the final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Statistical,
    Keyword,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statistical => "statistical",
            Self::Keyword => "keyword",
        }
    }
}

/// Final classification of a single text.
///
/// Confidence is always within `[0.0, 1.0]`; the constructor clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f32,
    pub method: Method,
}

impl ClassificationResult {
    pub fn new(category: Category, confidence: f32, method: Method) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            category,
            confidence,
            method,
        }
    }

    /// Placeholder substituted for batch items that could not be classified.
    pub fn fallback() -> Self {
        Self::new(Category::Other, 0.0, Method::Keyword)
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}
