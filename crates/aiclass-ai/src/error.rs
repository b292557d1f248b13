use std::path::PathBuf;

use thiserror::Error;

use crate::keywords::KeywordError;

/// The only error `HybridEngine::classify` lets escape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("input text is empty or whitespace")]
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("use_ai_threshold must be within [0, 1], got {0}")]
    Threshold(f32),

    #[error("strong_match_norm must be positive and finite, got {0}")]
    MatchNorm(f32),

    #[error("no_match_confidence must be within [0, 1], got {0}")]
    NoMatchConfidence(f32),

    #[error("keyword table: {0}")]
    Keywords(#[from] KeywordError),
}
