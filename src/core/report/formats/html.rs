//! HTML report generator
//!
//! Generates self-contained HTML grade reports with embedded CSS. The final
//! grade is color-coded by band: red below 60, orange below 70, yellow below
//! 80, green at 80 and above.

use crate::core::aggregator::CategoryBreakdown;
use crate::core::report::{format_slots, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("../templates/report.html");

/// HTML report generator with a color-coded final grade
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let mut output = HTML_TEMPLATE.to_string();

        output = output.replace("{{title}}", ctx.title);
        output = output.replace(
            "{{final_grade}}",
            &format!("{:.2}", ctx.summary.final_grade),
        );
        output = output.replace("{{band_class}}", ctx.band().css_class());

        let category_rows = generate_category_rows(ctx);
        output = output.replace("{{category_rows}}", &category_rows);

        let targets_section = generate_targets_section(ctx);
        output = output.replace("{{targets_section}}", &targets_section);

        output = output.replace("{{version}}", env!("CARGO_PKG_VERSION"));

        output
    }
}

/// Generate `<tr>` rows for the category breakdown table
fn generate_category_rows(ctx: &ReportContext) -> String {
    let mut rows = String::new();

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
                    rows,
                    "    <tr><td>{}</td><td>{weight_pct}</td><td>{}</td><td>{average:.2}</td><td>{weighted:.2}</td><td>{completed}</td></tr>",
                    spec.name,
                    format_slots(scores)
                );
            }
            Some(CategoryBreakdown::Penalty { units, impact }) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let max_units = spec.max_value() as u32;
                let _ = writeln!(
                    rows,
                    "    <tr><td>{}</td><td>{weight_pct}</td><td>{units} absence(s)</td><td>-</td><td>{impact:.2}</td><td>{units}/{max_units}</td></tr>",
                    spec.name
                );
            }
            None => {
                let completed = spec
                    .expected_count()
                    .map_or_else(|| "-".to_string(), |expected| format!("0/{expected}"));
                let _ = writeln!(
                    rows,
                    "    <tr><td>{}</td><td>{weight_pct}</td><td>—</td><td>-</td><td>-</td><td>{completed}</td></tr>",
                    spec.name
                );
            }
        }
    }

    rows
}

/// Generate the needed-grade targets section as an HTML table
fn generate_targets_section(ctx: &ReportContext) -> String {
    if ctx.targets.is_empty() {
        return "<p>No targets requested.</p>".to_string();
    }

    let mut html = String::new();
    html.push_str("<table>\n  <thead>\n");
    html.push_str(
        "    <tr><th>Target</th><th>Points Needed</th><th>Needed Average</th><th>Status</th></tr>\n",
    );
    html.push_str("  </thead>\n  <tbody>\n");

    for result in ctx.targets {
        if let Some(needed) = &result.needed {
            let ceiling = result.score_ceiling(ctx.scheme);
            let (status, class) = if needed.needed_average <= 0.0 {
                ("already met", "status-met")
            } else if needed.needed_average > ceiling {
                ("unreachable", "status-unreachable")
            } else {
                ("attainable", "")
            };
            let _ = writeln!(
                html,
                "    <tr><td>{:.0}%</td><td>{:.2}</td><td>{:.2}</td><td class=\"{class}\">{status}</td></tr>",
                result.target, needed.points_needed, needed.needed_average
            );
        } else {
            let _ = writeln!(
                html,
                "    <tr><td>{:.0}%</td><td>-</td><td>-</td><td>everything already graded</td></tr>",
                result.target
            );
        }
    }

    html.push_str("  </tbody>\n</table>\n");

    if let Some(needed) = ctx.targets.iter().find_map(|t| t.needed.as_ref()) {
        html.push_str("<h3>Remaining Work</h3>\n<table>\n  <thead>\n");
        html.push_str("    <tr><th>Category</th><th>Items Left</th><th>Weight Share</th></tr>\n");
        html.push_str("  </thead>\n  <tbody>\n");

        for spec in ctx.scheme.fixed_count_categories() {
            if let Some(share) = needed.remaining.get(&spec.name) {
                let _ = writeln!(
                    html,
                    "    <tr><td>{}</td><td>{}</td><td>{:.1}%</td></tr>",
                    spec.name,
                    share.count,
                    share.weight_share * 100.0
                );
            }
        }

        html.push_str("  </tbody>\n</table>\n");
    }

    html
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
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

    #[test]
    fn color_codes_the_final_grade() {
        let aggregator = GradeAggregator::standard();
        let mut scores = ScoreSet::new();
        scores.insert(
            "exams".to_string(),
            CategoryScores::entered_list(&[90.0, 95.0]),
        );
        scores.insert(
            "homeworks".to_string(),
            CategoryScores::entered_list(&[100.0, 100.0, 100.0, 100.0, 100.0]),
        );
        scores.insert(
            "quizzes".to_string(),
            CategoryScores::entered_list(&[100.0, 100.0, 100.0, 100.0]),
        );
        scores.insert(
            "projects".to_string(),
            CategoryScores::entered_list(&[100.0, 100.0, 100.0, 100.0]),
        );
        let summary = aggregator.compute(&scores);

        let ctx = ReportContext {
            title: "CS 3100",
            scheme: aggregator.scheme(),
            scores: &scores,
            summary: &summary,
            targets: &[],
        };

        let rendered = HtmlReporter::new().render(&ctx).expect("render");
        // 0.15*100 + 0.15*100 + 0.20*100 + 0.50*92.5 = 96.25: green band
        assert!(rendered.contains("band-green"));
        assert!(rendered.contains("96.25%"));
        assert!(rendered.contains("<p>No targets requested.</p>"));
    }

    #[test]
    fn flags_unreachable_targets() {
        let aggregator = GradeAggregator::standard();
        let mut scores = ScoreSet::new();
        scores.insert(
            "exams".to_string(),
            CategoryScores::Scores(vec![Some(20.0), None]),
        );
        scores.insert(
            "homeworks".to_string(),
            CategoryScores::entered_list(&[30.0, 30.0, 30.0, 30.0, 30.0]),
        );
        scores.insert(
            "quizzes".to_string(),
            CategoryScores::entered_list(&[30.0, 30.0, 30.0, 30.0]),
        );
        scores.insert(
            "projects".to_string(),
            CategoryScores::entered_list(&[30.0, 30.0, 30.0, 30.0]),
        );
        let summary = aggregator.compute(&scores);
        let targets = vec![TargetResult {
            target: 90.0,
            needed: aggregator.needed_for_target(&scores, 90.0),
        }];

        let ctx = ReportContext {
            title: "CS 3100",
            scheme: aggregator.scheme(),
            scores: &scores,
            summary: &summary,
            targets: &targets,
        };

        let rendered = HtmlReporter::new().render(&ctx).expect("render");
        // Current grade is 25 with only one exam (25% weight) left; 90 is
        // far beyond a perfect remaining score
        assert!(rendered.contains("status-unreachable"));
        assert!(rendered.contains("band-red"));
    }
}
