//! Accuracy report over a labelled file of `text<TAB>category id` lines.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use aiclass_ai::HybridEngine;
use aiclass_core::{Category, text};
use anyhow::Context;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CategoryTally {
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug)]
pub struct EvalStats {
    pub total: usize,
    pub correct: usize,
    /// Indexed by expected category id.
    pub per_category: [CategoryTally; Category::COUNT],
    /// (expected, predicted) → count, wrong predictions only.
    pub confusions: BTreeMap<(Category, Category), usize>,
    pub confidence_correct: f64,
    pub confidence_wrong: f64,
    pub skipped: usize,
    pub elapsed_secs: f64,
}

impl EvalStats {
    fn new() -> Self {
        Self {
            total: 0,
            correct: 0,
            per_category: [CategoryTally::default(); Category::COUNT],
            confusions: BTreeMap::new(),
            confidence_correct: 0.0,
            confidence_wrong: 0.0,
            skipped: 0,
            elapsed_secs: 0.0,
        }
    }

    pub fn wrong(&self) -> usize {
        self.total - self.correct
    }

    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.correct as f64, self.total)
    }

    pub fn mean_confidence(&self) -> Option<f64> {
        ratio(self.confidence_correct + self.confidence_wrong, self.total)
    }

    pub fn mean_confidence_correct(&self) -> Option<f64> {
        ratio(self.confidence_correct, self.correct)
    }

    pub fn mean_confidence_wrong(&self) -> Option<f64> {
        ratio(self.confidence_wrong, self.wrong())
    }
}

fn ratio(sum: f64, n: usize) -> Option<f64> {
    (n > 0).then(|| sum / n as f64)
}

/// Split a `text<TAB>id` line. The id is taken after the last tab.
fn parse_line(line: &str) -> anyhow::Result<(&str, Category)> {
    let (input, id) = line
        .rsplit_once('\t')
        .context("expected `text<TAB>category id`")?;
    let id: i64 = id
        .trim()
        .parse()
        .with_context(|| format!("invalid category id {:?}", id.trim()))?;
    let category = Category::try_from(id)?;
    Ok((input, category))
}

/// Classify every labelled line of `path` and compare against its label.
///
/// Empty lines are ignored; lines whose text is blank are counted as skipped.
pub fn run_evaluate(engine: &HybridEngine, path: &Path) -> anyhow::Result<EvalStats> {
    let start = Instant::now();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let mut stats = EvalStats::new();
    for (n, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (input, expected) =
            parse_line(line).with_context(|| format!("{}:{}", path.display(), n + 1))?;
        if text::is_blank(input) {
            stats.skipped += 1;
            continue;
        }
        let result = engine
            .classify(input)
            .with_context(|| format!("{}:{}", path.display(), n + 1))?;

        let confidence = f64::from(result.confidence);
        let tally = &mut stats.per_category[expected.id() as usize];
        tally.total += 1;
        stats.total += 1;
        if result.category == expected {
            tally.correct += 1;
            stats.correct += 1;
            stats.confidence_correct += confidence;
        } else {
            *stats
                .confusions
                .entry((expected, result.category))
                .or_default() += 1;
            stats.confidence_wrong += confidence;
        }
    }

    stats.elapsed_secs = start.elapsed().as_secs_f64();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use aiclass_ai::{EngineConfig, KeywordTable};

    use super::*;

    fn engine() -> HybridEngine {
        HybridEngine::keyword_only(&EngineConfig::default(), KeywordTable::builtin())
    }

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn reports_accuracy_and_confusions() {
        let file = write_file(
            "Veicoli autonomi con sensori LiDAR\t5\n\
             \n\
             Diagnosi medica con radiologia\t7\n\
             Ricetta della carbonara tradizionale\t0\n\
             Bracci robotici per l'industria\t3\n",
        );
        let stats = run_evaluate(&engine(), file.path()).unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.correct, 3);
        assert_eq!(stats.wrong(), 1);
        assert_eq!(stats.accuracy(), Some(0.75));
        assert_eq!(
            stats.per_category[Category::AutonomousDriving.id() as usize],
            CategoryTally {
                correct: 1,
                total: 1
            }
        );
        assert_eq!(
            stats.per_category[Category::ComputerVision.id() as usize],
            CategoryTally {
                correct: 0,
                total: 1
            }
        );
        assert_eq!(
            stats.confusions.get(&(Category::ComputerVision, Category::Robotics)),
            Some(&1)
        );
        assert!(stats.mean_confidence_correct().is_some());
        assert!(stats.mean_confidence_wrong().is_some());
    }

    #[test]
    fn blank_text_is_skipped() {
        let file = write_file("   \t2\nGPT-4 generative text\t2\n");
        let stats = run_evaluate(&engine(), file.path()).unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.mean_confidence_wrong(), None);
    }

    #[test]
    fn empty_file_has_no_accuracy() {
        let file = write_file("");
        let stats = run_evaluate(&engine(), file.path()).unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.accuracy(), None);
    }

    #[test]
    fn malformed_lines_are_errors() {
        for content in ["no tab here\n", "some text\tseven\n", "some text\t8\n"] {
            let file = write_file(content);
            let err = run_evaluate(&engine(), file.path()).unwrap_err();
            assert!(format!("{err:#}").contains(":1"), "{content:?}: {err:#}");
        }
    }

    #[test]
    fn parse_line_uses_last_tab() {
        let (input, category) = parse_line("a\tb\t6").unwrap();
        assert_eq!(input, "a\tb");
        assert_eq!(category, Category::DataScience);
    }
}
