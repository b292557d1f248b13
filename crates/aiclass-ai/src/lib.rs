//! Classification layer: keyword scoring, the statistical collaborator contract,
//! and the hybrid decision engine that combines them.

pub mod batch;
pub mod config;
pub mod engine;
mod error;
pub mod keywords;
pub mod scorer;
pub mod statistical;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

pub use batch::BatchCoordinator;
pub use config::EngineConfig;
pub use engine::{HybridEngine, ModelInfo};
pub use error::{ConfigError, EngineError};
pub use keywords::{KeywordError, KeywordTable, MatchMode};
pub use scorer::{KeywordScore, KeywordScorer, ScorerConfig};
pub use statistical::{InferenceError, ModelUnavailable, Prediction, StatisticalClassifier};
