//! Integration tests for report generation from score files

use gradetally::core::aggregator::GradeAggregator;
use gradetally::core::report::{
    formats::ReportFormat, HtmlReporter, MarkdownReporter, ReportContext, ReportGenerator,
    TargetResult,
};
use gradetally::core::scheme::GradingScheme;
use gradetally::core::scores::{load_scores_file, validate_ranges};
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

#[test]
fn test_report_format_parsing() {
    assert_eq!(ReportFormat::from_str("markdown").unwrap(), ReportFormat::Markdown);
    assert_eq!(ReportFormat::from_str("md").unwrap(), ReportFormat::Markdown);
    assert_eq!(ReportFormat::from_str("HTML").unwrap(), ReportFormat::Html);
    assert!(ReportFormat::from_str("pdf").is_err());
}

#[test]
fn test_markdown_report_from_sample_scores() {
    let scheme = GradingScheme::standard();
    let scores = load_scores_file(sample_path("cs3100_scores.toml")).expect("Failed to load");
    validate_ranges(&scores, &scheme).expect("Sample scores should be in range");

    let aggregator = GradeAggregator::new(scheme);
    let summary = aggregator.compute(&scores);
    let targets = vec![TargetResult {
        target: 70.0,
        needed: aggregator.needed_for_target(&scores, 70.0),
    }];

    let ctx = ReportContext {
        title: "cs3100_scores",
        scheme: aggregator.scheme(),
        scores: &scores,
        summary: &summary,
        targets: &targets,
    };

    let rendered = MarkdownReporter::new().render(&ctx).expect("render");

    assert!(rendered.contains("# Grade Report: cs3100_scores"));
    assert!(rendered.contains("51.05% (red)"));
    assert!(rendered.contains("| homeworks | 15.0% |"));
    assert!(rendered.contains("| 70% | 18.95 |"));
}

#[test]
fn test_html_report_written_to_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("cs3100_report.html");

    let scheme = GradingScheme::standard();
    let scores = load_scores_file(sample_path("cs3100_scores.toml")).expect("Failed to load");
    let aggregator = GradeAggregator::new(scheme);
    let summary = aggregator.compute(&scores);

    let ctx = ReportContext {
        title: "cs3100_scores",
        scheme: aggregator.scheme(),
        scores: &scores,
        summary: &summary,
        targets: &[],
    };

    HtmlReporter::new()
        .generate(&ctx, &output_path)
        .expect("Failed to write report");

    let contents = std::fs::read_to_string(&output_path).expect("Report file should exist");
    assert!(contents.contains("<!DOCTYPE html>"));
    assert!(contents.contains("cs3100_scores"));
    assert!(contents.contains("band-red"));
}

#[test]
fn test_custom_scheme_sample_loads_and_renders() {
    let scheme =
        GradingScheme::from_file(sample_path("custom_scheme.toml")).expect("Failed to load scheme");
    assert!(scheme.get("midterm").is_some());
    assert!(scheme.get("participation").is_some());

    let aggregator = GradeAggregator::new(scheme);
    let scores = gradetally::core::scores::parse_scores_toml(
        r#"
midterm = [82.0]
participation = 2
"#,
    )
    .expect("Failed to parse");
    validate_ranges(&scores, aggregator.scheme()).expect("Scores should be in range");

    let summary = aggregator.compute(&scores);
    // 0.45*82 - 2 points of participation penalty = 34.9
    assert!((summary.final_grade - 34.9).abs() < 1e-9);

    let targets = vec![TargetResult {
        target: 75.0,
        needed: aggregator.needed_for_target(&scores, 75.0),
    }];
    let ctx = ReportContext {
        title: "custom",
        scheme: aggregator.scheme(),
        scores: &scores,
        summary: &summary,
        targets: &targets,
    };

    let rendered = MarkdownReporter::new().render(&ctx).expect("render");
    // Only the final remains (45% share): (75 - 34.9) / 0.45 = 89.11
    assert!(rendered.contains("89.11"));
    assert!(rendered.contains("| final | 1 | 45.0% |"));
}
