//! Grade command handler
//!
//! Computes and prints the grade breakdown for a scores file, plus
//! needed-grade solutions for any requested targets.

use gradetally::config::Config;
use gradetally::core::{
    aggregator::{CategoryBreakdown, GradeAggregator},
    report::GradeBand,
    scheme::GradingScheme,
    scores::{load_scores_file, validate_ranges, CategoryScores, ScoreSet},
};
use logger::{error, info, verbose};
use std::path::Path;

/// Run the grade command.
///
/// # Arguments
/// * `input_file` - Path to a TOML scores file
/// * `scheme_path` - Optional grading scheme file; falls back to config, then standard
/// * `targets` - Target final grades to solve for
/// * `config` - Configuration containing the default scheme path
pub fn run(input_file: &Path, scheme_path: Option<&Path>, targets: &[f64], config: &Config) {
    if let Err(err) = compute_and_print(input_file, scheme_path, targets, config) {
        error!("Grade computation failed for {}: {err}", input_file.display());
        eprintln!("{err}");
    }
}

/// Resolve the grading scheme: explicit flag, then config, then the standard scheme
pub fn resolve_scheme(scheme_path: Option<&Path>, config: &Config) -> Result<GradingScheme, String> {
    if let Some(path) = scheme_path {
        return GradingScheme::from_file(path)
            .map_err(|e| format!("✗ Failed to load scheme {}: {e}", path.display()));
    }

    if !config.grading.scheme.is_empty() {
        let path = Path::new(&config.grading.scheme);
        return GradingScheme::from_file(path)
            .map_err(|e| format!("✗ Failed to load configured scheme {}: {e}", path.display()));
    }

    verbose!("No scheme specified, using the standard scheme");
    Ok(GradingScheme::standard())
}

/// Load a scores file and check every entry against the scheme's ranges
pub fn load_checked_scores(input_file: &Path, scheme: &GradingScheme) -> Result<ScoreSet, String> {
    let scores = load_scores_file(input_file).map_err(|e| {
        error!("Failed to load scores {}: {e}", input_file.display());
        format!("✗ Failed to load {}: {e}", input_file.display())
    })?;

    validate_ranges(&scores, scheme).map_err(|e| format!("✗ Invalid scores: {e}"))?;

    info!("Scores loaded: {}", input_file.display());
    Ok(scores)
}

fn compute_and_print(
    input_file: &Path,
    scheme_path: Option<&Path>,
    targets: &[f64],
    config: &Config,
) -> Result<(), String> {
    let scheme = resolve_scheme(scheme_path, config)?;
    let scores = load_checked_scores(input_file, &scheme)?;

    let aggregator = GradeAggregator::new(scheme);
    let summary = aggregator.compute(&scores);

    let title = input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("scores");
    println!("\n=== Grade Breakdown: {title} ===\n");

    for spec in &aggregator.scheme().categories {
        println!("{} ({:.1}%):", spec.name, spec.weight * 100.0);
        match summary.breakdown.get(&spec.name) {
            Some(CategoryBreakdown::Averaged {
                scores: slots,
                average,
                weighted,
            }) => {
                let entered: Vec<String> = slots
                    .iter()
                    .flatten()
                    .map(|score| format!("{score}"))
                    .collect();
                println!("  Scores: {}", entered.join(", "));
                println!("  Average: {average:.2}");
                println!("  Weighted contribution: {weighted:.2}");
                if let Some(expected) = spec.expected_count() {
                    let done = scores
                        .get(&spec.name)
                        .map_or(0, CategoryScores::entered_count);
                    println!("  Completed: {done}/{expected}");
                }
            }
            Some(CategoryBreakdown::Penalty { units, impact }) => {
                println!("  Absences: {units}");
                println!("  Impact: {impact:.2}");
            }
            None => {
                println!("  No scores entered yet");
            }
        }
        println!();
    }

    let band = GradeBand::for_grade(summary.final_grade);
    println!("{}", "-".repeat(50));
    println!(
        "Current Grade: {:.2}% ({})",
        summary.final_grade,
        band.label()
    );

    for &target in targets {
        print_target(&aggregator, &scores, target);
    }

    Ok(())
}

/// Print the needed-grade solution for a single target
fn print_target(aggregator: &GradeAggregator, scores: &ScoreSet, target: f64) {
    println!("\nTo reach {target:.0}%:");

    let Some(needed) = aggregator.needed_for_target(scores, target) else {
        println!("  Everything is already graded; the final grade is fixed.");
        return;
    };

    println!("  Points needed: {:.2}", needed.points_needed);
    println!(
        "  Average needed on remaining work: {:.2}",
        needed.needed_average
    );

    if needed.needed_average <= 0.0 {
        println!("  Target already met.");
    }

    println!("  Remaining work:");
    for spec in aggregator.scheme().fixed_count_categories() {
        if let Some(share) = needed.remaining.get(&spec.name) {
            println!(
                "    {}: {} left ({:.1}% of final grade)",
                spec.name,
                share.count,
                share.weight_share * 100.0
            );
        }
    }
}
