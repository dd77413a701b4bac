//! Report generation for grade breakdowns
//!
//! Renders a computed [`GradeSummary`] (plus optional needed-grade targets)
//! in Markdown or HTML. The final grade is classified into a color band for
//! display; the aggregation core itself knows nothing about presentation.

pub mod formats;

use crate::core::aggregator::{GradeSummary, NeededGrade};
use crate::core::scheme::GradingScheme;
use crate::core::scores::ScoreSet;
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Display classification of a final grade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    /// Below 60
    Red,
    /// 60 to below 70
    Orange,
    /// 70 to below 80
    Yellow,
    /// 80 and above
    Green,
}

impl GradeBand {
    /// Classify a final grade
    #[must_use]
    pub fn for_grade(grade: f64) -> Self {
        if grade < 60.0 {
            Self::Red
        } else if grade < 70.0 {
            Self::Orange
        } else if grade < 80.0 {
            Self::Yellow
        } else {
            Self::Green
        }
    }

    /// Lowercase color name, used as a display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }

    /// CSS class used by the HTML reporter
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Red => "band-red",
            Self::Orange => "band-orange",
            Self::Yellow => "band-yellow",
            Self::Green => "band-green",
        }
    }
}

/// A needed-grade solution for one target, or `None` when nothing remains
#[derive(Debug, Clone, PartialEq)]
pub struct TargetResult {
    /// The target final grade
    pub target: f64,
    /// The solver result; `None` when everything is already graded
    pub needed: Option<NeededGrade>,
}

impl TargetResult {
    /// Highest score ceiling among the categories with remaining work,
    /// used to flag unreachable targets
    #[must_use]
    pub fn score_ceiling(&self, scheme: &GradingScheme) -> f64 {
        self.needed.as_ref().map_or(100.0, |needed| {
            needed
                .remaining
                .keys()
                .filter_map(|name| scheme.get(name))
                .map(super::scheme::CategorySpec::max_value)
                .fold(100.0, f64::max)
        })
    }
}

/// Data context for report generation
///
/// Aggregates everything needed to render a grade report, providing a single
/// source of truth for templates.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Report title (e.g. the course name or scores file stem)
    pub title: &'a str,
    /// Grading scheme the summary was computed under
    pub scheme: &'a GradingScheme,
    /// Score set as entered
    pub scores: &'a ScoreSet,
    /// Computed final grade and breakdown
    pub summary: &'a GradeSummary,
    /// Needed-grade results, one per requested target
    pub targets: &'a [TargetResult],
}

impl ReportContext<'_> {
    /// Band classification of the final grade
    #[must_use]
    pub fn band(&self) -> GradeBand {
        GradeBand::for_grade(self.summary.final_grade)
    }

    /// Entered-score count for a category, zero when absent
    #[must_use]
    pub fn entered_count(&self, category: &str) -> usize {
        self.scores
            .get(category)
            .map_or(0, crate::core::scores::CategoryScores::entered_count)
    }
}

/// Trait for report renderers
pub trait ReportGenerator {
    /// Render the report and write it to `output_path`
    ///
    /// # Errors
    /// Returns an error if rendering or writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Render the report to a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}

/// Format a score slot list for display ("89, 83, —" with em dash for
/// ungraded slots)
#[must_use]
pub fn format_slots(slots: &[Option<f64>]) -> String {
    let rendered: Vec<String> = slots
        .iter()
        .map(|slot| slot.map_or_else(|| "—".to_string(), trim_number))
        .collect();
    rendered.join(", ")
}

/// Format a float without trailing zeros (89 rather than 89.00, 62.5 as is)
#[must_use]
pub fn trim_number(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
