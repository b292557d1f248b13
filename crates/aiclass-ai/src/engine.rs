//! Hybrid decision engine.
//!
//! Asks the statistical classifier first and trusts it outright when its
//! confidence reaches `use_ai_threshold`. Below the threshold the keyword
//! scorer also runs and the more confident of the two wins, with ties going
//! to the statistical result. A failed prediction falls back to keywords for
//! that call only. If the classifier cannot be acquired at construction the
//! engine stays keyword-only for its whole lifetime.

use std::panic::{self, AssertUnwindSafe};

use aiclass_core::{Category, CategoryEntry, ClassificationResult, text};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::keywords::KeywordTable;
use crate::scorer::KeywordScorer;
use crate::statistical::{InferenceError, ModelUnavailable, StatisticalClassifier};

/// Final decisions below this confidence are logged for review.
const LOW_CONFIDENCE: f32 = 0.5;

/// Characters of input shown in log lines.
const LOG_PREVIEW_CHARS: usize = 30;

pub struct HybridEngine {
    threshold: f32,
    scorer: KeywordScorer,
    statistical: Option<Box<dyn StatisticalClassifier>>,
}

/// Snapshot of the engine's configuration and collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub statistical_available: bool,
    pub keyword_available: bool,
    pub threshold: f32,
    pub model: Option<String>,
    pub keyword_terms: usize,
    pub categories: Vec<CategoryEntry>,
}

impl HybridEngine {
    /// Build an engine, acquiring the statistical classifier through `acquire`.
    ///
    /// Acquisition failure is logged once and leaves the engine in degraded
    /// (keyword-only) mode; it is never retried.
    pub fn new<C, F>(config: &EngineConfig, table: KeywordTable, acquire: F) -> Self
    where
        C: StatisticalClassifier + 'static,
        F: FnOnce() -> Result<C, ModelUnavailable>,
    {
        let statistical: Option<Box<dyn StatisticalClassifier>> = match acquire() {
            Ok(model) => {
                info!(model = model.model_name(), "statistical classifier loaded");
                Some(Box::new(model))
            }
            Err(e) => {
                warn!(error = %e, "statistical classifier unavailable, using keyword scoring only");
                None
            }
        };
        Self::assemble(config, table, statistical)
    }

    /// Build an engine that never consults a statistical classifier.
    pub fn keyword_only(config: &EngineConfig, table: KeywordTable) -> Self {
        info!("engine running in keyword-only mode");
        Self::assemble(config, table, None)
    }

    /// Build an engine from configuration alone.
    ///
    /// Loads the keyword table (built-in unless `keywords_path` is set) and,
    /// when compiled with the `onnx` feature and `model_dir` is set, the ONNX
    /// classifier. Only configuration errors fail; a missing model degrades.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = config.keyword_table()?;

        #[cfg(feature = "onnx")]
        {
            if let Some(dir) = &config.model_dir {
                return Ok(Self::new(config, table, || crate::OnnxClassifier::load(dir)));
            }
        }

        #[cfg(not(feature = "onnx"))]
        {
            if let Some(dir) = &config.model_dir {
                warn!(
                    model_dir = %dir.display(),
                    "built without the `onnx` feature, ignoring model_dir"
                );
            }
        }

        Ok(Self::keyword_only(config, table))
    }

    fn assemble(
        config: &EngineConfig,
        table: KeywordTable,
        statistical: Option<Box<dyn StatisticalClassifier>>,
    ) -> Self {
        Self {
            threshold: config.use_ai_threshold,
            scorer: KeywordScorer::new(table, config.scorer),
            statistical,
        }
    }

    /// Classify one text.
    ///
    /// Fails only with [`EngineError::InvalidInput`] for blank text; every
    /// classifier-side failure is absorbed into the keyword fallback.
    pub fn classify(&self, input: &str) -> Result<ClassificationResult, EngineError> {
        if text::is_blank(input) {
            return Err(EngineError::InvalidInput);
        }
        let input = input.trim();

        let Some(model) = &self.statistical else {
            return Ok(self.keyword(input));
        };

        let predicted = panic::catch_unwind(AssertUnwindSafe(|| model.predict(input)))
            .unwrap_or(Err(InferenceError::Panicked));
        let statistical = match predicted.and_then(|p| p.validate()) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    error = %e,
                    text = %text::preview(input, LOG_PREVIEW_CHARS),
                    "statistical prediction failed, falling back to keywords"
                );
                return Ok(self.keyword(input));
            }
        };

        if statistical.confidence >= self.threshold {
            return Ok(statistical);
        }

        let keyword = self.keyword(input);
        let decision = if keyword.confidence > statistical.confidence {
            keyword
        } else {
            statistical
        };

        if decision.confidence < LOW_CONFIDENCE {
            debug!(
                text = %text::preview(input, LOG_PREVIEW_CHARS),
                category = %decision.category,
                confidence = decision.confidence,
                method = decision.method.as_str(),
                "low-confidence classification"
            );
        }
        Ok(decision)
    }

    fn keyword(&self, input: &str) -> ClassificationResult {
        self.scorer.score(input).into()
    }

    /// True when no statistical classifier is available.
    pub fn is_degraded(&self) -> bool {
        self.statistical.is_none()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn scorer(&self) -> &KeywordScorer {
        &self.scorer
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            statistical_available: !self.is_degraded(),
            keyword_available: true,
            threshold: self.threshold,
            model: self
                .statistical
                .as_ref()
                .map(|m| m.model_name().to_string()),
            keyword_terms: self.scorer.table().len(),
            categories: Category::ALL.into_iter().map(CategoryEntry::from).collect(),
        }
    }

    /// Release the statistical classifier. The engine is keyword-only afterwards.
    pub fn cleanup(&mut self) {
        if let Some(mut model) = self.statistical.take() {
            let name = model.model_name().to_string();
            model.release();
            info!(model = %name, "statistical classifier released");
        }
    }
}
