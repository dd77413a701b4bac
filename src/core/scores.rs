//! Score set model and score-file parsing
//!
//! A score set maps category names to either an ordered list of optional
//! scores (averaged categories) or a bare unit count (penalty categories,
//! e.g. absences). `None` in a score list means "not yet entered" and is
//! distinct from a zero score.
//!
//! Score files are TOML. TOML has no null, so files carry only entered
//! scores; `None` placeholders arise through the API (form-style front ends
//! pre-size their lists).

use crate::core::scheme::{CategoryKind, GradingScheme};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Per-category input: entered scores or a unit count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryScores {
    /// Unit count for a penalty category (e.g. number of absences)
    Units(u32),
    /// Ordered score slots; `None` is a slot not yet graded
    Scores(Vec<Option<f64>>),
}

impl CategoryScores {
    /// Build a score list where every slot is entered
    #[must_use]
    pub fn entered_list(values: &[f64]) -> Self {
        Self::Scores(values.iter().copied().map(Some).collect())
    }

    /// Entered (non-`None`) scores, in order. Empty for unit counts.
    #[must_use]
    pub fn entered(&self) -> Vec<f64> {
        match self {
            Self::Units(_) => Vec::new(),
            Self::Scores(slots) => slots.iter().filter_map(|s| *s).collect(),
        }
    }

    /// Number of entered scores. Zero for unit counts.
    #[must_use]
    pub fn entered_count(&self) -> usize {
        match self {
            Self::Units(_) => 0,
            Self::Scores(slots) => slots.iter().filter(|s| s.is_some()).count(),
        }
    }
}

/// Mapping from category name to its recorded input
pub type ScoreSet = HashMap<String, CategoryScores>;

/// Parse a score set from a TOML string
///
/// Each key maps to either an array of numbers or a bare integer count:
///
/// ```toml
/// homeworks = [89, 83, 62]
/// attendance = 0
/// ```
///
/// # Errors
/// Returns an error if the TOML cannot be parsed or a value is neither an
/// array of numbers nor an integer
pub fn parse_scores_toml(toml_str: &str) -> Result<ScoreSet, Box<dyn Error>> {
    let scores: ScoreSet = toml::from_str(toml_str)?;
    Ok(scores)
}

/// Load a score set from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn load_scores_file<P: AsRef<Path>>(path: P) -> Result<ScoreSet, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    parse_scores_toml(&content)
}

/// Validate a score set against a scheme's input ranges
///
/// This is the collaborator-side line of defense the aggregation core relies
/// on: entered scores must lie within `0..=max_score`, unit counts within
/// `0..=max_units`, the input shape must match the category kind, entered
/// lists may not exceed the expected assignment count, and every category
/// name must exist in the scheme. The core itself never validates.
///
/// # Errors
/// Returns a message describing the first problem found
pub fn validate_ranges(scores: &ScoreSet, scheme: &GradingScheme) -> Result<(), String> {
    // Walk scheme order so failure messages are deterministic
    for spec in &scheme.categories {
        let Some(recorded) = scores.get(&spec.name) else {
            continue;
        };

        match (&spec.kind, recorded) {
            (CategoryKind::Averaged { max_score, expected }, CategoryScores::Scores(slots)) => {
                if let Some(expected) = expected {
                    if slots.len() > *expected as usize {
                        return Err(format!(
                            "Category '{}' has {} score slots but expects at most {expected}",
                            spec.name,
                            slots.len()
                        ));
                    }
                }
                for (idx, slot) in slots.iter().enumerate() {
                    if let Some(score) = slot {
                        if !score.is_finite() || *score < 0.0 || score > max_score {
                            return Err(format!(
                                "Score {} for '{}' slot {} is outside 0-{max_score}",
                                score,
                                spec.name,
                                idx + 1
                            ));
                        }
                    }
                }
            }
            (CategoryKind::Penalty { max_units }, CategoryScores::Units(units)) => {
                if units > max_units {
                    return Err(format!(
                        "Count {units} for '{}' exceeds the maximum of {max_units}",
                        spec.name
                    ));
                }
            }
            (CategoryKind::Averaged { .. }, CategoryScores::Units(_)) => {
                return Err(format!(
                    "Category '{}' expects a list of scores, not a bare count",
                    spec.name
                ));
            }
            (CategoryKind::Penalty { .. }, CategoryScores::Scores(_)) => {
                return Err(format!(
                    "Category '{}' expects a bare count, not a list of scores",
                    spec.name
                ));
            }
        }
    }

    for name in scores.keys() {
        if scheme.get(name).is_none() {
            return Err(format!("Unknown category '{name}' in score file"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheme::GradingScheme;

    #[test]
    fn parses_mixed_score_file() {
        let scores = parse_scores_toml(
            r"
homeworks = [89, 83, 62.5]
exams = []
attendance = 2
",
        )
        .expect("parse scores");

        assert_eq!(
            scores.get("homeworks").unwrap().entered(),
            vec![89.0, 83.0, 62.5]
        );
        assert_eq!(scores.get("exams").unwrap().entered_count(), 0);
        assert_eq!(scores.get("attendance"), Some(&CategoryScores::Units(2)));
    }

    #[test]
    fn entered_skips_ungraded_slots() {
        let slots = CategoryScores::Scores(vec![Some(90.0), None, Some(75.0), None]);
        assert_eq!(slots.entered(), vec![90.0, 75.0]);
        assert_eq!(slots.entered_count(), 2);
    }

    #[test]
    fn rejects_score_above_ceiling() {
        let scheme = GradingScheme::standard();
        let mut scores = ScoreSet::new();
        scores.insert(
            "quizzes".to_string(),
            CategoryScores::entered_list(&[101.0]),
        );

        let err = validate_ranges(&scores, &scheme).expect_err("quiz above 100");
        assert!(err.contains("quizzes"));
    }

    #[test]
    fn accepts_bonus_score_in_bonus_category() {
        let scheme = GradingScheme::standard();
        let mut scores = ScoreSet::new();
        scores.insert(
            "homeworks".to_string(),
            CategoryScores::entered_list(&[115.0]),
        );

        assert!(validate_ranges(&scores, &scheme).is_ok());
    }

    #[test]
    fn rejects_too_many_absences() {
        let scheme = GradingScheme::standard();
        let mut scores = ScoreSet::new();
        scores.insert("attendance".to_string(), CategoryScores::Units(6));

        assert!(validate_ranges(&scores, &scheme).is_err());
    }

    #[test]
    fn rejects_shape_mismatch() {
        let scheme = GradingScheme::standard();

        let mut scores = ScoreSet::new();
        scores.insert("attendance".to_string(), CategoryScores::entered_list(&[]));
        assert!(validate_ranges(&scores, &scheme).is_err());

        let mut scores = ScoreSet::new();
        scores.insert("exams".to_string(), CategoryScores::Units(1));
        assert!(validate_ranges(&scores, &scheme).is_err());
    }

    #[test]
    fn rejects_unknown_category() {
        let scheme = GradingScheme::standard();
        let mut scores = ScoreSet::new();
        scores.insert("midterms".to_string(), CategoryScores::entered_list(&[90.0]));

        let err = validate_ranges(&scores, &scheme).expect_err("unknown category");
        assert!(err.contains("midterms"));
    }

    #[test]
    fn rejects_excess_score_slots() {
        let scheme = GradingScheme::standard();
        let mut scores = ScoreSet::new();
        scores.insert(
            "exams".to_string(),
            CategoryScores::entered_list(&[90.0, 80.0, 70.0]),
        );

        assert!(validate_ranges(&scores, &scheme).is_err());
    }
}
