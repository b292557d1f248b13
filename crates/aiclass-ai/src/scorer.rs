//! Deterministic keyword scorer.
//!
//! For each category, sums the weights of the distinct terms found in the
//! normalised text and maps the sum to a confidence with
//! `min(1.0, weight_sum / strong_match_norm)`. The category with the highest
//! sum wins; ties go to the category with more total occurrences, then to the
//! lowest id. Text with no matches at all scores as the catch-all with a fixed
//! confidence: absence of AI vocabulary is itself weak evidence.

use aiclass_core::{Category, ClassificationResult, Method, text};
use serde::Deserialize;

use crate::keywords::KeywordTable;

/// Confidence returned for text that matches no keyword.
pub const DEFAULT_NO_MATCH_CONFIDENCE: f32 = 0.8;

/// Weight sum treated as a strong match (confidence 1.0).
pub const DEFAULT_STRONG_MATCH_NORM: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScorerConfig {
    pub strong_match_norm: f32,
    pub no_match_confidence: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            strong_match_norm: DEFAULT_STRONG_MATCH_NORM,
            no_match_confidence: DEFAULT_NO_MATCH_CONFIDENCE,
        }
    }
}

/// Outcome of a keyword scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordScore {
    pub category: Category,
    pub confidence: f32,
    /// Distinct terms of the winning category found in the text.
    pub matched: usize,
    /// Total occurrences of those terms.
    pub occurrences: usize,
}

impl From<KeywordScore> for ClassificationResult {
    fn from(s: KeywordScore) -> Self {
        ClassificationResult::new(s.category, s.confidence, Method::Keyword)
    }
}

/// Per-category tally during a scan.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    weight: f32,
    matched: usize,
    occurrences: usize,
}

pub struct KeywordScorer {
    table: KeywordTable,
    config: ScorerConfig,
}

impl KeywordScorer {
    pub fn new(table: KeywordTable, config: ScorerConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    pub fn config(&self) -> ScorerConfig {
        self.config
    }

    /// Score a text. Never fails; blank text simply has no matches.
    pub fn score(&self, input: &str) -> KeywordScore {
        let normalized = text::normalize(input);

        let mut best: Option<(Category, Tally)> = None;
        for category in self.table.categories() {
            let tally = self.tally(category, &normalized);
            if tally.matched == 0 {
                continue;
            }
            // Categories are visited in id order, so strict comparison keeps
            // the lowest id on a full tie.
            let better = match &best {
                None => true,
                Some((_, b)) => {
                    tally.weight > b.weight
                        || (tally.weight == b.weight && tally.occurrences > b.occurrences)
                }
            };
            if better {
                best = Some((category, tally));
            }
        }

        match best {
            Some((category, tally)) => KeywordScore {
                category,
                confidence: (tally.weight / self.config.strong_match_norm).min(1.0),
                matched: tally.matched,
                occurrences: tally.occurrences,
            },
            None => KeywordScore {
                category: Category::Other,
                confidence: self.config.no_match_confidence,
                matched: 0,
                occurrences: 0,
            },
        }
    }

    fn tally(&self, category: Category, normalized: &str) -> Tally {
        let mut tally = Tally::default();
        for keyword in self.table.keywords(category) {
            let n = keyword.occurrences(normalized);
            if n > 0 {
                tally.weight += keyword.weight();
                tally.matched += 1;
                tally.occurrences += n;
            }
        }
        tally
    }
}
