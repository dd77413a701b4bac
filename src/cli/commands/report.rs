//! Report command handler
//!
//! Generates grade reports in Markdown or HTML with a color-coded final
//! grade and optional needed-grade targets.

use crate::commands::grade::{load_checked_scores, resolve_scheme};
use gradetally::config::Config;
use gradetally::core::{
    aggregator::{GradeAggregator, GradeSummary},
    report::{
        formats::ReportFormat, HtmlReporter, MarkdownReporter, ReportContext, ReportGenerator,
        TargetResult,
    },
    scores::ScoreSet,
};
use logger::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Run the report command.
///
/// # Arguments
/// * `input_file` - Path to a TOML scores file
/// * `output_file` - Optional output path
/// * `format_str` - Report format (markdown, html)
/// * `scheme_path` - Optional grading scheme file
/// * `targets` - Target final grades to solve for
/// * `config` - Configuration containing the default reports directory
pub fn run(
    input_file: &Path,
    output_file: Option<&Path>,
    format_str: &str,
    scheme_path: Option<&Path>,
    targets: &[f64],
    config: &Config,
) {
    if let Err(err) = generate_report(
        input_file,
        output_file,
        format_str,
        scheme_path,
        targets,
        config,
    ) {
        error!(
            "Report generation failed for {}: {err}",
            input_file.display()
        );
        eprintln!("{err}");
    }
}

/// Prepared report data ready for rendering
struct ReportData {
    aggregator: GradeAggregator,
    scores: ScoreSet,
    summary: GradeSummary,
    targets: Vec<TargetResult>,
}

/// Load scores, compute the breakdown, and solve any requested targets
fn prepare_report_data(
    input_file: &Path,
    scheme_path: Option<&Path>,
    targets: &[f64],
    config: &Config,
) -> Result<ReportData, String> {
    let scheme = resolve_scheme(scheme_path, config)?;
    let scores = load_checked_scores(input_file, &scheme)?;

    let aggregator = GradeAggregator::new(scheme);
    let summary = aggregator.compute(&scores);

    let targets = targets
        .iter()
        .map(|&target| TargetResult {
            target,
            needed: aggregator.needed_for_target(&scores, target),
        })
        .collect();

    Ok(ReportData {
        aggregator,
        scores,
        summary,
        targets,
    })
}

/// Write the report to a file in the specified format
fn write_report(
    data: &ReportData,
    title: &str,
    format: ReportFormat,
    output_path: &Path,
) -> Result<(), String> {
    let ctx = ReportContext {
        title,
        scheme: data.aggregator.scheme(),
        scores: &data.scores,
        summary: &data.summary,
        targets: &data.targets,
    };

    match format {
        ReportFormat::Markdown => {
            let reporter = MarkdownReporter::new();
            reporter
                .generate(&ctx, output_path)
                .map_err(|e| format!("✗ Failed to generate Markdown report: {e}"))?;
        }
        ReportFormat::Html => {
            let reporter = HtmlReporter::new();
            reporter
                .generate(&ctx, output_path)
                .map_err(|e| format!("✗ Failed to generate HTML report: {e}"))?;
        }
    }

    Ok(())
}

fn generate_report(
    input_file: &Path,
    output_file: Option<&Path>,
    format_str: &str,
    scheme_path: Option<&Path>,
    targets: &[f64],
    config: &Config,
) -> Result<(), String> {
    // Parse the format
    let format =
        ReportFormat::from_str(format_str).map_err(|e| format!("✗ {e}. Use: markdown or html"))?;

    // Prepare report data
    let data = prepare_report_data(input_file, scheme_path, targets, config)?;

    let title = input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("scores")
        .to_string();

    // Determine output path
    let final_output_path: PathBuf = if let Some(output) = output_file {
        output.to_path_buf()
    } else {
        let reports_dir = PathBuf::from(&config.paths.reports_dir);
        std::fs::create_dir_all(&reports_dir).map_err(|e| {
            format!(
                "✗ Failed to create reports directory {}: {e}",
                reports_dir.display()
            )
        })?;

        let output_filename = format!("{title}_report.{}", format.extension());
        reports_dir.join(output_filename)
    };

    // Write the report
    write_report(&data, &title, format, &final_output_path)?;

    println!("✓ Report generated: {}", final_output_path.display());
    info!("Report exported to: {}", final_output_path.display());
    println!(
        "Current Grade: {:.2}% over {} categor{}",
        data.summary.final_grade,
        data.summary.breakdown.len(),
        if data.summary.breakdown.len() == 1 {
            "y"
        } else {
            "ies"
        }
    );

    Ok(())
}
