//! Batch classification with per-item failure isolation.
//!
//! Output always has the input's length and order. Any item that fails,
//! whether by invalid input or by a panic escaping the engine, is replaced
//! with the fallback result (catch-all, confidence 0.0, keyword method).

use std::panic::{self, AssertUnwindSafe};

use aiclass_core::{ClassificationResult, text};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::engine::HybridEngine;

pub struct BatchCoordinator<'a> {
    engine: &'a HybridEngine,
}

impl<'a> BatchCoordinator<'a> {
    pub fn new(engine: &'a HybridEngine) -> Self {
        Self { engine }
    }

    /// Classify texts sequentially, in order.
    pub fn classify_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<ClassificationResult> {
        let results: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| self.classify_item(i, t.as_ref()))
            .collect();
        debug!(count = results.len(), "batch classified");
        results
    }

    /// Classify texts on the rayon pool. Order is preserved.
    pub fn classify_batch_parallel<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> Vec<ClassificationResult> {
        let results: Vec<_> = texts
            .par_iter()
            .enumerate()
            .map(|(i, t)| self.classify_item(i, t.as_ref()))
            .collect();
        debug!(count = results.len(), "batch classified in parallel");
        results
    }

    fn classify_item(&self, index: usize, input: &str) -> ClassificationResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.engine.classify(input)));
        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(index, error = %e, "batch item rejected, substituting fallback");
                ClassificationResult::fallback()
            }
            Err(_) => {
                warn!(
                    index,
                    text = %text::preview(input, 30),
                    "batch item panicked, substituting fallback"
                );
                ClassificationResult::fallback()
            }
        }
    }
}
