//! File batch pipeline: reads one text per line, classifies, collects stats.

use std::path::Path;
use std::time::Instant;

use aiclass_ai::{BatchCoordinator, HybridEngine};
use aiclass_core::{BatchPredictItem, Category, Method, text};
use anyhow::Context;

const CHUNK_SIZE: usize = 256;

pub struct BatchStats {
    pub total: usize,
    pub blank: usize,
    pub per_category: [usize; Category::COUNT],
    pub statistical: usize,
    pub elapsed_secs: f64,
}

/// Classify every line of `path`, preserving line order.
pub fn run_batch(
    engine: &HybridEngine,
    path: &Path,
    parallel: bool,
) -> anyhow::Result<(Vec<BatchPredictItem>, BatchStats)> {
    let start = Instant::now();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len();
    eprintln!("  Read {total} lines from {}", path.display());

    let coordinator = BatchCoordinator::new(engine);
    let mut items = Vec::with_capacity(total);
    let mut stats = BatchStats {
        total,
        blank: 0,
        per_category: [0; Category::COUNT],
        statistical: 0,
        elapsed_secs: 0.0,
    };

    for chunk in lines.chunks(CHUNK_SIZE) {
        let results = if parallel {
            coordinator.classify_batch_parallel(chunk)
        } else {
            coordinator.classify_batch(chunk)
        };

        for (line, result) in chunk.iter().zip(results) {
            if text::is_blank(line) {
                stats.blank += 1;
            } else {
                stats.per_category[result.category.id() as usize] += 1;
                if result.method == Method::Statistical {
                    stats.statistical += 1;
                }
            }
            items.push(BatchPredictItem::new(line.to_string(), result));
        }

        eprint!(
            "\r  Classified {}/{total} ({:.1}%)",
            items.len(),
            items.len() as f64 / total as f64 * 100.0
        );
    }
    if total > 0 {
        eprintln!();
    }

    stats.elapsed_secs = start.elapsed().as_secs_f64();
    Ok((items, stats))
}
