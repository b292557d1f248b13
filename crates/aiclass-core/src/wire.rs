//! Request/response bodies shared by the inference server and its client.

use serde::{Deserialize, Serialize};

use crate::{Category, ClassificationResult, Method};

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Response of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Category id (0 is the catch-all).
    pub prediction: u8,
    pub confidence: f32,
    /// Human-readable category name.
    pub category: String,
    /// Absent when talking to servers that predate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
}

impl From<ClassificationResult> for PredictResponse {
    fn from(r: ClassificationResult) -> Self {
        Self {
            prediction: r.category.id(),
            confidence: r.confidence,
            category: r.category.name().to_string(),
            method: Some(r.method),
        }
    }
}

/// One element of the `POST /predict_batch` response, echoing the input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictItem {
    pub text: String,
    pub prediction: u8,
    pub confidence: f32,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
}

impl BatchPredictItem {
    pub fn new(text: String, r: ClassificationResult) -> Self {
        Self {
            text,
            prediction: r.category.id(),
            confidence: r.confidence,
            category: r.category.name().to_string(),
            method: Some(r.method),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"healthy"` when the statistical model is loaded, `"degraded"` otherwise.
    pub status: String,
    pub statistical_model: bool,
    pub threshold: f32,
}

/// Entry of `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: u8,
    pub name: String,
}

impl From<Category> for CategoryEntry {
    fn from(c: Category) -> Self {
        Self {
            id: c.id(),
            name: c.name().to_string(),
        }
    }
}

/// Body of a failed `/predict` or `/predict_batch` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_response_from_result() {
        let r = ClassificationResult::new(Category::GenerativeAi, 0.9, Method::Statistical);
        let resp = PredictResponse::from(r);
        assert_eq!(resp.prediction, 2);
        assert_eq!(resp.category, "Generative AI");
        assert_eq!(resp.method, Some(Method::Statistical));
    }

    #[test]
    fn predict_response_wire_shape() {
        let resp = PredictResponse::from(ClassificationResult::new(
            Category::Other,
            0.8,
            Method::Keyword,
        ));
        let v: serde_json::Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["prediction"], 0);
        assert_eq!(v["category"], "OTHER");
        assert_eq!(v["method"], "keyword");
        assert!((v["confidence"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn predict_response_without_method_field() {
        let json = r#"{"prediction": 3, "confidence": 0.75, "category": "Computer Vision"}"#;
        let parsed: PredictResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.prediction, 3);
        assert!(parsed.method.is_none());
    }

    #[test]
    fn batch_item_echoes_text() {
        let item = BatchPredictItem::new(
            "Tesla Autopilot".into(),
            ClassificationResult::new(Category::AutonomousDriving, 0.66, Method::Keyword),
        );
        let v: serde_json::Value = serde_json::to_value(&item).unwrap();
        assert_eq!(v["text"], "Tesla Autopilot");
        assert_eq!(v["prediction"], 5);
        assert_eq!(v["category"], "Autonomous Driving");
    }

    #[test]
    fn category_entry_from_category() {
        let e = CategoryEntry::from(Category::MedicalAi);
        assert_eq!(e, CategoryEntry { id: 7, name: "Medical AI".into() });
    }
}
