//! Lexical trigger table used by the keyword scorer.
//!
//! Every topical category owns a set of weighted terms. A term matches either
//! anywhere in the text (`Substring`) or only as a whole word or phrase
//! (`Word`). Terms are stored normalised (lowercase, single spaces) and the
//! table is immutable once built. The catch-all category never has terms.

use std::collections::HashSet;
use std::path::Path;

use aiclass_core::{Category, text};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("reading keyword file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing keyword file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown category id {0}")]
    UnknownCategory(i64),

    #[error("the catch-all category cannot have keywords")]
    CatchAll,

    #[error("keyword {term:?} has invalid weight {weight}")]
    InvalidWeight { term: String, weight: f32 },

    #[error("empty keyword for category {0}")]
    EmptyTerm(Category),
}

/// How a term is located in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Substring,
    Word,
}

/// A single weighted trigger term.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    term: String,
    weight: f32,
    mode: MatchMode,
}

impl Keyword {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Count non-overlapping occurrences in already-normalised text.
    pub fn occurrences(&self, normalized: &str) -> usize {
        match self.mode {
            MatchMode::Substring => normalized.matches(self.term.as_str()).count(),
            MatchMode::Word => word_occurrences(normalized, &self.term),
        }
    }
}

/// Whole-word hits of `term`. A hit rejected at a boundary resumes one char
/// later, so a valid phrase overlapping it is still found.
fn word_occurrences(text: &str, term: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = text[from..].find(term) {
        let start = from + pos;
        let end = start + term.len();
        if is_word_bounded(text, start, end) {
            count += 1;
            from = end;
        } else {
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
    }
    count
}

/// Both sides of `text[start..end]` are either the text edge or a non-alphanumeric char.
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Keyword table indexed by category id.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    by_category: Vec<Vec<Keyword>>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordTable {
    /// A table with no terms: every text scores as no-match.
    pub fn empty() -> Self {
        Self {
            by_category: vec![Vec::new(); Category::COUNT],
        }
    }

    /// Add a term to a category. Duplicate terms (same text and mode) are ignored.
    pub fn insert(
        &mut self,
        category: Category,
        term: &str,
        weight: f32,
        mode: MatchMode,
    ) -> Result<&mut Self, KeywordError> {
        if category.is_other() {
            return Err(KeywordError::CatchAll);
        }
        let term = text::normalize(term);
        if term.is_empty() {
            return Err(KeywordError::EmptyTerm(category));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(KeywordError::InvalidWeight { term, weight });
        }

        let slot = &mut self.by_category[category.id() as usize];
        if !slot.iter().any(|k| k.term == term && k.mode == mode) {
            slot.push(Keyword { term, weight, mode });
        }
        Ok(self)
    }

    pub fn keywords(&self, category: Category) -> &[Keyword] {
        &self.by_category[category.id() as usize]
    }

    /// Total number of terms across all categories.
    pub fn len(&self) -> usize {
        self.by_category.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Categories that own at least one term, in id order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(|c| !self.keywords(*c).is_empty())
    }

    /// Load a table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, KeywordError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a table from TOML.
    ///
    /// ```toml
    /// [[categories]]
    /// id = 2
    /// weight = 1.0          # optional, default 1.0
    /// words = ["gpt", "llm"]
    /// substrings = ["generat"]
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, KeywordError> {
        let file: TableFile = toml::from_str(s)?;
        let mut table = Self::empty();
        let mut seen = HashSet::new();

        for section in file.categories {
            let category = Category::try_from(section.id)
                .map_err(|_| KeywordError::UnknownCategory(section.id))?;
            seen.insert(category);
            for w in &section.words {
                table.insert(category, w, section.weight, MatchMode::Word)?;
            }
            for s in &section.substrings {
                table.insert(category, s, section.weight, MatchMode::Substring)?;
            }
        }

        tracing::debug!(
            categories = seen.len(),
            terms = table.len(),
            "loaded keyword table"
        );
        Ok(table)
    }

    /// The built-in English/Italian table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for &(category, words, substrings) in BUILTIN {
            let slot = &mut table.by_category[category.id() as usize];
            slot.extend(words.iter().map(|&t| Keyword {
                term: t.to_string(),
                weight: 1.0,
                mode: MatchMode::Word,
            }));
            slot.extend(substrings.iter().map(|&t| Keyword {
                term: t.to_string(),
                weight: 1.0,
                mode: MatchMode::Substring,
            }));
        }
        table
    }
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(default)]
    categories: Vec<CategorySection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CategorySection {
    id: i64,
    #[serde(default = "default_weight")]
    weight: f32,
    #[serde(default)]
    words: Vec<String>,
    #[serde(default)]
    substrings: Vec<String>,
}

fn default_weight() -> f32 {
    1.0
}

// ── Built-in table ──
//
// (category, whole-word terms, substring terms). Terms must already be
// lowercase with single spaces.

type BuiltinEntry = (Category, &'static [&'static str], &'static [&'static str]);

const BUILTIN: &[BuiltinEntry] = &[
    (
        Category::GeneralAi,
        &[
            "ai",
            "artificial intelligence",
            "intelligenza artificiale",
            "machine learning",
            "apprendimento automatico",
            "deep learning",
            "neural network",
            "neural networks",
            "rete neurale",
            "reti neurali",
            "reinforcement learning",
            "agi",
        ],
        &[],
    ),
    (
        Category::GenerativeAi,
        &[
            "gpt",
            "gpt-4",
            "chatgpt",
            "openai",
            "llm",
            "large language model",
            "dall-e",
            "stable diffusion",
            "midjourney",
            "gan",
            "text generation",
            "generazione di testo",
        ],
        &["generativ"],
    ),
    (
        Category::ComputerVision,
        &[
            "computer vision",
            "visione artificiale",
            "image recognition",
            "riconoscimento di immagini",
            "riconoscimento facciale",
            "facial recognition",
            "object detection",
            "riconoscimento oggetti",
            "yolo",
            "ocr",
            "convolutional",
            "convoluzionali",
        ],
        &["segmenta"],
    ),
    (
        Category::Robotics,
        &[
            "cobot",
            "humanoid",
            "umanoide",
            "manipulator",
            "braccio robotico",
            "bracci robotici",
            "industria 4.0",
        ],
        &["robot"],
    ),
    (
        Category::AutonomousDriving,
        &[
            "self-driving",
            "full self-driving",
            "guida autonoma",
            "autonomous driving",
            "autonomous vehicle",
            "autonomous vehicles",
            "veicoli autonomi",
            "veicolo autonomo",
            "autopilot",
            "lidar",
            "tesla",
            "waymo",
            "adas",
        ],
        &[],
    ),
    (
        Category::DataScience,
        &[
            "data science",
            "data scientist",
            "big data",
            "data mining",
            "data analysis",
            "analisi dei dati",
            "analisi predittiva",
            "predictive analytics",
            "business intelligence",
            "dataset",
            "statistics",
            "statistica",
            "apache spark",
            "pandas",
        ],
        &["analytic"],
    ),
    (
        Category::MedicalAi,
        &[
            "diagnosi",
            "diagnosis",
            "medical",
            "medica",
            "medico",
            "medicina",
            "clinical",
            "radiology",
            "radiologia",
            "radiologiche",
            "tumori",
            "tumor",
            "cancer",
            "drug discovery",
            "healthcare",
            "chirurgia",
            "surgery",
        ],
        &[],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_topical_category() {
        let table = KeywordTable::builtin();
        let covered: Vec<_> = table.categories().collect();
        assert_eq!(covered.len(), Category::COUNT - 1);
        assert!(table.keywords(Category::Other).is_empty());
    }

    #[test]
    fn builtin_terms_are_normalized() {
        let table = KeywordTable::builtin();
        for c in Category::ALL {
            for k in table.keywords(c) {
                assert_eq!(k.term(), text::normalize(k.term()), "term {:?}", k.term());
            }
        }
    }

    #[test]
    fn word_mode_respects_boundaries() {
        let mut table = KeywordTable::empty();
        table
            .insert(Category::GeneralAi, "ai", 1.0, MatchMode::Word)
            .unwrap();
        let k = &table.keywords(Category::GeneralAi)[0];
        assert_eq!(k.occurrences("ai for medical imaging"), 1);
        assert_eq!(k.occurrences("the ai, the ai!"), 2);
        assert_eq!(k.occurrences("said again"), 0);
        assert_eq!(k.occurrences("mail"), 0);
    }

    #[test]
    fn word_mode_matches_phrases_and_hyphens() {
        let mut table = KeywordTable::empty();
        table
            .insert(Category::GenerativeAi, "gpt", 1.0, MatchMode::Word)
            .unwrap()
            .insert(Category::AutonomousDriving, "self-driving", 1.0, MatchMode::Word)
            .unwrap();
        let gpt = &table.keywords(Category::GenerativeAi)[0];
        assert_eq!(gpt.occurrences("gpt-4 and chatgpt"), 1);
        let sd = &table.keywords(Category::AutonomousDriving)[0];
        assert_eq!(sd.occurrences("full self-driving cars"), 1);
    }

    #[test]
    fn substring_mode_matches_inside_words() {
        let mut table = KeywordTable::empty();
        table
            .insert(Category::Robotics, "robot", 1.0, MatchMode::Substring)
            .unwrap();
        let k = &table.keywords(Category::Robotics)[0];
        assert_eq!(k.occurrences("robotica e robot"), 2);
        assert_eq!(k.occurrences("robotica e cobot"), 1);
    }

    #[test]
    fn word_mode_finds_phrase_after_rejected_overlap() {
        let mut table = KeywordTable::empty();
        table
            .insert(Category::GeneralAi, "ab ab", 1.0, MatchMode::Word)
            .unwrap();
        let k = &table.keywords(Category::GeneralAi)[0];
        assert_eq!(k.occurrences("cab ab ab"), 1);
        assert_eq!(k.occurrences("ab ab ab ab"), 2);
        assert_eq!(k.occurrences("cab ab abc"), 0);
    }

    #[test]
    fn insert_normalizes_and_dedupes() {
        let mut table = KeywordTable::empty();
        table
            .insert(Category::DataScience, "  Big   Data ", 1.0, MatchMode::Word)
            .unwrap()
            .insert(Category::DataScience, "big data", 2.0, MatchMode::Word)
            .unwrap();
        let kws = table.keywords(Category::DataScience);
        assert_eq!(kws.len(), 1);
        assert_eq!(kws[0].term(), "big data");
        assert_eq!(kws[0].weight(), 1.0);
    }

    #[test]
    fn insert_rejects_invalid_entries() {
        let mut table = KeywordTable::empty();
        assert!(matches!(
            table.insert(Category::Other, "x", 1.0, MatchMode::Word),
            Err(KeywordError::CatchAll)
        ));
        assert!(matches!(
            table.insert(Category::GeneralAi, "   ", 1.0, MatchMode::Word),
            Err(KeywordError::EmptyTerm(Category::GeneralAi))
        ));
        assert!(matches!(
            table.insert(Category::GeneralAi, "ai", 0.0, MatchMode::Word),
            Err(KeywordError::InvalidWeight { .. })
        ));
        assert!(matches!(
            table.insert(Category::GeneralAi, "ai", f32::INFINITY, MatchMode::Word),
            Err(KeywordError::InvalidWeight { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn parses_toml_table() {
        let toml = r#"
            [[categories]]
            id = 2
            words = ["GPT", "llm"]
            substrings = ["generat"]

            [[categories]]
            id = 5
            weight = 2.5
            words = ["lidar"]
        "#;
        let table = KeywordTable::from_toml_str(toml).unwrap();
        assert_eq!(table.len(), 4);
        let gen_ai = table.keywords(Category::GenerativeAi);
        assert_eq!(gen_ai[0].term(), "gpt");
        assert_eq!(gen_ai[2].mode(), MatchMode::Substring);
        assert_eq!(table.keywords(Category::AutonomousDriving)[0].weight(), 2.5);
    }

    #[test]
    fn toml_rejects_catch_all_and_unknown_ids() {
        let err = KeywordTable::from_toml_str("[[categories]]\nid = 0\nwords = [\"x\"]").unwrap_err();
        assert!(matches!(err, KeywordError::CatchAll));
        let err = KeywordTable::from_toml_str("[[categories]]\nid = 9\nwords = [\"x\"]").unwrap_err();
        assert!(matches!(err, KeywordError::UnknownCategory(9)));
    }

    #[test]
    fn toml_rejects_unknown_fields() {
        let err = KeywordTable::from_toml_str("[[categories]]\nid = 1\nterms = [\"x\"]").unwrap_err();
        assert!(matches!(err, KeywordError::Parse(_)));
    }

    #[test]
    fn empty_toml_gives_empty_table() {
        let table = KeywordTable::from_toml_str("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.toml");
        std::fs::write(&path, "[[categories]]\nid = 7\nwords = [\"diagnosis\"]\n").unwrap();
        let table = KeywordTable::from_file(&path).unwrap();
        assert_eq!(table.keywords(Category::MedicalAi).len(), 1);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = KeywordTable::from_file(Path::new("/nonexistent/keywords.toml")).unwrap_err();
        assert!(matches!(err, KeywordError::Io(_)));
    }
}
