//! Engine configuration: defaults, optional TOML file, validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::keywords::KeywordTable;
use crate::scorer::ScorerConfig;

/// Statistical results at or above this confidence are accepted outright.
pub const DEFAULT_USE_AI_THRESHOLD: f32 = 0.3;

/// ```toml
/// use_ai_threshold = 0.3
/// model_dir = "models/ai-classifier"
/// keywords_path = "keywords.toml"
///
/// [scorer]
/// strong_match_norm = 3.0
/// no_match_confidence = 0.8
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub use_ai_threshold: f32,
    pub scorer: ScorerConfig,
    /// Directory holding `model.onnx` and `tokenizer.json`.
    pub model_dir: Option<PathBuf>,
    /// Alternate keyword table; the built-in table is used when unset.
    pub keywords_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_ai_threshold: DEFAULT_USE_AI_THRESHOLD,
            scorer: ScorerConfig::default(),
            model_dir: None,
            keywords_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.use_ai_threshold) {
            return Err(ConfigError::Threshold(self.use_ai_threshold));
        }
        let norm = self.scorer.strong_match_norm;
        if !norm.is_finite() || norm <= 0.0 {
            return Err(ConfigError::MatchNorm(norm));
        }
        if !(0.0..=1.0).contains(&self.scorer.no_match_confidence) {
            return Err(ConfigError::NoMatchConfidence(
                self.scorer.no_match_confidence,
            ));
        }
        Ok(())
    }

    /// The configured keyword table, or the built-in one.
    pub fn keyword_table(&self) -> Result<KeywordTable, ConfigError> {
        match &self.keywords_path {
            Some(path) => Ok(KeywordTable::from_file(path)?),
            None => Ok(KeywordTable::builtin()),
        }
    }
}
