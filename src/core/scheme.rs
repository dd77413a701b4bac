//! Grading scheme model
//!
//! A scheme is the fixed configuration of a course's grading: an ordered list
//! of categories, each with a signed fractional weight and an aggregation
//! kind. The kind is a tagged variant so the two aggregation algorithms
//! (averaging vs. linear penalty) are explicit and exhaustively matched.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

/// Default input ceiling for a single score
fn default_max_score() -> f64 {
    100.0
}

/// How a category's entered values are turned into grade points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryKind {
    /// Entered scores are averaged, then scaled by the category weight
    Averaged {
        /// Fixed number of graded items, when the category has one
        /// (extra credit has none)
        #[serde(default)]
        expected: Option<u32>,
        /// Input ceiling for a single score. Informational for front ends
        /// and reports; the core never clamps scores against it.
        #[serde(default = "default_max_score")]
        max_score: f64,
    },
    /// A unit count (e.g. absences) scaled linearly, reaching the full
    /// configured weight at `max_units`
    Penalty {
        /// Unit count at which the penalty reaches the full weight
        max_units: u32,
    },
}

/// A single grading category within a scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category name, used as the key in score sets (e.g. "homeworks")
    pub name: String,

    /// Signed fractional weight (e.g. 0.15, or -0.05 for a penalty)
    pub weight: f64,

    /// Aggregation behavior for the category
    #[serde(flatten)]
    pub kind: CategoryKind,
}

impl CategorySpec {
    /// Create an averaged category
    #[must_use]
    pub fn averaged(name: &str, weight: f64, expected: Option<u32>, max_score: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            kind: CategoryKind::Averaged {
                expected,
                max_score,
            },
        }
    }

    /// Create a penalty category
    #[must_use]
    pub fn penalty(name: &str, weight: f64, max_units: u32) -> Self {
        Self {
            name: name.to_string(),
            weight,
            kind: CategoryKind::Penalty { max_units },
        }
    }

    /// Fixed assignment count, when the category has one
    #[must_use]
    pub const fn expected_count(&self) -> Option<u32> {
        match self.kind {
            CategoryKind::Averaged { expected, .. } => expected,
            CategoryKind::Penalty { .. } => None,
        }
    }

    /// Input ceiling for a single value in this category
    ///
    /// For averaged categories this is the per-score ceiling; for penalty
    /// categories it is `max_units` as a float.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        match self.kind {
            CategoryKind::Averaged { max_score, .. } => max_score,
            CategoryKind::Penalty { max_units } => f64::from(max_units),
        }
    }
}

/// An ordered grading scheme: category weights and assignment counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingScheme {
    /// Categories in display order
    pub categories: Vec<CategorySpec>,
}

impl GradingScheme {
    /// The standard scheme: homeworks 15%, quizzes 15%, projects 20%,
    /// exams 50%, extra credit 7%, attendance -5% over 5 absences.
    /// Homeworks and projects accept bonus scores up to 130.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            categories: vec![
                CategorySpec::averaged("homeworks", 0.15, Some(5), 130.0),
                CategorySpec::averaged("quizzes", 0.15, Some(4), 100.0),
                CategorySpec::averaged("projects", 0.20, Some(4), 130.0),
                CategorySpec::averaged("exams", 0.50, Some(2), 100.0),
                CategorySpec::averaged("extra_credit", 0.07, None, 100.0),
                CategorySpec::penalty("attendance", -0.05, 5),
            ],
        }
    }

    /// Look up a category by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Categories with a fixed assignment count, in scheme order
    pub fn fixed_count_categories(&self) -> impl Iterator<Item = &CategorySpec> {
        self.categories
            .iter()
            .filter(|c| c.expected_count().is_some())
    }

    /// Parse a scheme from a TOML string and validate it
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or the scheme is invalid
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let scheme: Self = toml::from_str(toml_str)?;
        scheme.validate()?;
        Ok(scheme)
    }

    /// Load a scheme from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or the scheme
    /// is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check scheme consistency
    ///
    /// # Errors
    /// Returns a message naming the first problem found: an empty scheme,
    /// a duplicate category name, a non-finite weight, a zero expected
    /// count, a non-positive score ceiling, or zero `max_units`.
    pub fn validate(&self) -> Result<(), String> {
        if self.categories.is_empty() {
            return Err("Scheme has no categories".to_string());
        }

        for (idx, spec) in self.categories.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(format!("Category at position {idx} has an empty name"));
            }
            if self.categories[..idx].iter().any(|c| c.name == spec.name) {
                return Err(format!("Duplicate category name '{}'", spec.name));
            }
            if !spec.weight.is_finite() {
                return Err(format!("Category '{}' has a non-finite weight", spec.name));
            }
            match spec.kind {
                CategoryKind::Averaged {
                    expected,
                    max_score,
                } => {
                    if expected == Some(0) {
                        return Err(format!(
                            "Category '{}' has an expected count of zero",
                            spec.name
                        ));
                    }
                    if max_score <= 0.0 || !max_score.is_finite() {
                        return Err(format!(
                            "Category '{}' has an invalid score ceiling",
                            spec.name
                        ));
                    }
                }
                CategoryKind::Penalty { max_units } => {
                    if max_units == 0 {
                        return Err(format!(
                            "Category '{}' has zero max_units; the penalty slope is undefined",
                            spec.name
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
