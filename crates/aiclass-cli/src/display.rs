//! Plain-text rendering for classification results.

use aiclass_core::{BatchPredictItem, Category, ClassificationResult, text};

use crate::batch::BatchStats;
use crate::evaluate::EvalStats;

const TEXT_WIDTH: usize = 50;

pub fn print_result(input: &str, result: &ClassificationResult) {
    println!(
        "{:<20} {:.4}  {:<11}  {}",
        result.category.name(),
        result.confidence,
        result.method.as_str(),
        text::preview(input, TEXT_WIDTH)
    );
}

pub fn print_item(item: &BatchPredictItem) {
    let method = item.method.map_or("-", |m| m.as_str());
    println!(
        "{:<20} {:.4}  {:<11}  {}",
        item.category,
        item.confidence,
        method,
        text::preview(&item.text, TEXT_WIDTH)
    );
}

pub fn print_categories() {
    for category in Category::ALL {
        println!("  {:>2}  {}", category.id(), category.name());
    }
}

pub fn print_stats(stats: &BatchStats) {
    eprintln!();
    eprintln!("  {} texts in {:.2}s", stats.total, stats.elapsed_secs);
    if stats.elapsed_secs > 0.0 {
        eprintln!(
            "  {:.1} texts/s",
            stats.total as f64 / stats.elapsed_secs
        );
    }
    if stats.blank > 0 {
        eprintln!("  {} blank lines skipped", stats.blank);
    }
    eprintln!("  {} decided by the statistical model", stats.statistical);
    for category in Category::ALL {
        let n = stats.per_category[category.id() as usize];
        if n > 0 {
            eprintln!("    {:<20} {n}", category.name());
        }
    }
}

pub fn print_evaluation(stats: &EvalStats) {
    let Some(accuracy) = stats.accuracy() else {
        println!("No labelled texts to evaluate.");
        return;
    };

    println!("Overall accuracy");
    println!(
        "  {:.1}% ({}/{}) in {:.2}s",
        accuracy * 100.0,
        stats.correct,
        stats.total,
        stats.elapsed_secs
    );
    if stats.skipped > 0 {
        println!("  {} blank texts skipped", stats.skipped);
    }
    println!();

    println!("Accuracy per category");
    for category in Category::ALL {
        let tally = stats.per_category[category.id() as usize];
        if tally.total > 0 {
            println!(
                "  {:<20} {:>5.1}% ({}/{})",
                category.name(),
                tally.correct as f64 / tally.total as f64 * 100.0,
                tally.correct,
                tally.total
            );
        }
    }
    println!();

    if !stats.confusions.is_empty() {
        println!("Misclassifications");
        for ((expected, predicted), count) in &stats.confusions {
            println!("  {:<20} -> {:<20} {count}", expected.name(), predicted.name());
        }
        println!();
    }

    println!("Mean confidence");
    if let Some(c) = stats.mean_confidence() {
        println!("  {:<20} {:.1}%", "all", c * 100.0);
    }
    if let Some(c) = stats.mean_confidence_correct() {
        println!("  {:<20} {:.1}%", "correct", c * 100.0);
    }
    if let Some(c) = stats.mean_confidence_wrong() {
        println!("  {:<20} {:.1}%", "wrong", c * 100.0);
    }
}
