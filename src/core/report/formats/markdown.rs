//! Markdown report generator
//!
//! Generates grade reports in Markdown format. These reports render well in
//! GitHub, GitLab, and VS Code.

use crate::core::aggregator::CategoryBreakdown;
use crate::core::report::{format_slots, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{title}}", ctx.title);
        output = output.replace(
            "{{final_grade}}",
            &format!("{:.2}", ctx.summary.final_grade),
        );
        output = output.replace("{{band}}", ctx.band().label());

        let category_table = generate_category_table(ctx);
        output = output.replace("{{category_table}}", &category_table);

        let targets_section = generate_targets_section(ctx);
        output = output.replace("{{targets_section}}", &targets_section);

        output = output.replace("{{version}}", env!("CARGO_PKG_VERSION"));

        output
    }
}

/// Generate the per-category breakdown table
fn generate_category_table(ctx: &ReportContext) -> String {
    let mut table = String::new();

    table.push_str("| Category | Weight | Scores | Average | Weighted | Completed |\n");
    table.push_str("|---|---|---|---|---|---|\n");

    for spec in &ctx.scheme.categories {
        let weight_pct = format!("{:.1}%", spec.weight * 100.0);

        match ctx.summary.breakdown.get(&spec.name) {
            Some(CategoryBreakdown::Averaged {
                scores,
                average,
                weighted,
            }) => {
                let completed = spec.expected_count().map_or_else(
                    || "-".to_string(),
                    |expected| format!("{}/{expected}", ctx.entered_count(&spec.name)),
                );
                let _ = writeln!(
                    table,
                    "| {} | {weight_pct} | {} | {average:.2} | {weighted:.2} | {completed} |",
                    spec.name,
                    format_slots(scores)
                );
            }
            Some(CategoryBreakdown::Penalty { units, impact }) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let max_units = spec.max_value() as u32;
                let _ = writeln!(
                    table,
                    "| {} | {weight_pct} | {units} absence(s) | - | {impact:.2} | {units}/{max_units} |",
                    spec.name
                );
            }
            None => {
                let completed = spec
                    .expected_count()
                    .map_or_else(|| "-".to_string(), |expected| format!("0/{expected}"));
                let _ = writeln!(
                    table,
                    "| {} | {weight_pct} | — | - | - | {completed} |",
                    spec.name
                );
            }
        }
    }

    table
}

/// Generate the needed-grade targets section
fn generate_targets_section(ctx: &ReportContext) -> String {
    if ctx.targets.is_empty() {
        return "No targets requested.".to_string();
    }

    let mut section = String::new();
    section.push_str("| Target | Points Needed | Needed Average | Status |\n");
    section.push_str("|---|---|---|---|\n");

    for result in ctx.targets {
        if let Some(needed) = &result.needed {
            let ceiling = result.score_ceiling(ctx.scheme);
            let status = if needed.needed_average <= 0.0 {
                "already met"
            } else if needed.needed_average > ceiling {
                "unreachable"
            } else {
                "attainable"
            };
            let _ = writeln!(
                section,
                "| {:.0}% | {:.2} | {:.2} | {status} |",
                result.target, needed.points_needed, needed.needed_average
            );
        } else {
            let _ = writeln!(
                section,
                "| {:.0}% | - | - | everything already graded |",
                result.target
            );
        }
    }

    // Remaining work does not depend on the target value, so one table
    // covers all requested targets
    if let Some(needed) = ctx.targets.iter().find_map(|t| t.needed.as_ref()) {
        section.push_str("\n### Remaining Work\n\n");
        section.push_str("| Category | Items Left | Weight Share |\n");
        section.push_str("|---|---|---|\n");

        for spec in ctx.scheme.fixed_count_categories() {
            if let Some(share) = needed.remaining.get(&spec.name) {
                let _ = writeln!(
                    section,
                    "| {} | {} | {:.1}% |",
                    spec.name,
                    share.count,
                    share.weight_share * 100.0
                );
            }
        }
    }

    section
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::GradeAggregator;
    use crate::core::report::TargetResult;
    use crate::core::scores::{CategoryScores, ScoreSet};

    fn sample_scores() -> ScoreSet {
        let mut scores = ScoreSet::new();
        scores.insert(
            "homeworks".to_string(),
            CategoryScores::entered_list(&[89.0, 83.0, 62.0]),
        );
        scores.insert(
            "quizzes".to_string(),
            CategoryScores::entered_list(&[40.0, 62.0]),
        );
        scores.insert(
            "projects".to_string(),
            CategoryScores::entered_list(&[120.0, 127.0]),
        );
        scores.insert(
            "extra_credit".to_string(),
            CategoryScores::entered_list(&[100.0]),
        );
        scores.insert("attendance".to_string(), CategoryScores::Units(0));
        scores
    }

    #[test]
    fn renders_breakdown_and_targets() {
        let aggregator = GradeAggregator::standard();
        let scores = sample_scores();
        let summary = aggregator.compute(&scores);
        let targets = vec![TargetResult {
            target: 70.0,
            needed: aggregator.needed_for_target(&scores, 70.0),
        }];

        let ctx = ReportContext {
            title: "CS 3100",
            scheme: aggregator.scheme(),
            scores: &scores,
            summary: &summary,
            targets: &targets,
        };

        let rendered = MarkdownReporter::new().render(&ctx).expect("render");

        assert!(rendered.contains("# Grade Report: CS 3100"));
        assert!(rendered.contains("51.05% (red)"));
        assert!(rendered.contains("| homeworks | 15.0% | 89, 83, 62 | 78.00 | 11.70 | 3/5 |"));
        assert!(rendered.contains("| attendance | -5.0% | 0 absence(s) | - | 0.00 | 0/5 |"));
        // Exams have no entered scores: dash row, not omitted from display
        assert!(rendered.contains("| exams | 50.0% | — | - | - | 0/2 |"));
        // Target table and remaining work distribution
        assert!(rendered.contains("| 70% | 18.95 |"));
        assert!(rendered.contains("| exams | 2 | 50.0% |"));
    }

    #[test]
    fn renders_absent_solver_result() {
        let aggregator = GradeAggregator::standard();
        let mut scores = ScoreSet::new();
        for (name, count) in [("homeworks", 5), ("quizzes", 4), ("projects", 4), ("exams", 2)] {
            scores.insert(
                name.to_string(),
                CategoryScores::entered_list(&vec![90.0; count]),
            );
        }
        let summary = aggregator.compute(&scores);
        let targets = vec![TargetResult {
            target: 95.0,
            needed: aggregator.needed_for_target(&scores, 95.0),
        }];

        let ctx = ReportContext {
            title: "CS 3100",
            scheme: aggregator.scheme(),
            scores: &scores,
            summary: &summary,
            targets: &targets,
        };

        let rendered = MarkdownReporter::new().render(&ctx).expect("render");
        assert!(rendered.contains("everything already graded"));
    }
}
