//! Weighted grade aggregation
//!
//! The aggregator owns an immutable [`GradingScheme`] and computes, from a
//! caller-supplied [`ScoreSet`], the per-category breakdown and final grade,
//! plus the inverse problem: the average required on remaining fixed-count
//! work to reach a target grade. Both operations are pure; nothing is cached
//! or mutated between calls.

use crate::core::scheme::{CategoryKind, GradingScheme};
use crate::core::scores::{CategoryScores, ScoreSet};
use std::collections::HashMap;

/// Per-category results keyed by category name
pub type GradeBreakdown = HashMap<String, CategoryBreakdown>;

/// Remaining-work shares keyed by category name
pub type RemainingWeights = HashMap<String, RemainingShare>;

/// One category's contribution to the final grade
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryBreakdown {
    /// An averaged category with at least one entered score
    Averaged {
        /// The score slots as recorded, ungraded slots included
        scores: Vec<Option<f64>>,
        /// Arithmetic mean of the entered scores
        average: f64,
        /// Mean scaled by the category weight, in grade points
        weighted: f64,
    },
    /// A penalty category (always present when recorded, even at zero units)
    Penalty {
        /// Recorded unit count, clamped to the category's `max_units`
        units: u32,
        /// Penalty in grade points (zero or negative for negative weights)
        impact: f64,
    },
}

impl CategoryBreakdown {
    /// Grade points this category contributed to the final grade
    #[must_use]
    pub const fn contribution(&self) -> f64 {
        match self {
            Self::Averaged { weighted, .. } => *weighted,
            Self::Penalty { impact, .. } => *impact,
        }
    }
}

/// Final grade plus the per-category breakdown behind it
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    /// Unbounded signed percentage; bonus scores can push it above 100
    pub final_grade: f64,
    /// Contributions per category; categories with no entered scores are absent
    pub breakdown: GradeBreakdown,
}

/// Remaining ungraded work in one fixed-count category
#[derive(Debug, Clone, PartialEq)]
pub struct RemainingShare {
    /// Number of items not yet entered
    pub count: u32,
    /// Fraction of the total grade weight still controlled by this work
    pub weight_share: f64,
}

/// Solution of the needed-grade problem for one target
#[derive(Debug, Clone, PartialEq)]
pub struct NeededGrade {
    /// Final grade for the scores as entered
    pub current_grade: f64,
    /// Grade points between the current grade and the target
    pub points_needed: f64,
    /// Mean score required on every remaining fixed-count item. May be
    /// negative (target already met) or above the score ceiling (target
    /// unreachable); flagging either is the caller's job.
    pub needed_average: f64,
    /// Remaining-weight share per category, only for categories with
    /// remaining work
    pub remaining: RemainingWeights,
}

/// Computes weighted grades and needed averages for one grading scheme
#[derive(Debug, Clone)]
pub struct GradeAggregator {
    scheme: GradingScheme,
}

impl GradeAggregator {
    /// Create an aggregator over an explicit scheme
    #[must_use]
    pub const fn new(scheme: GradingScheme) -> Self {
        Self { scheme }
    }

    /// Create an aggregator over the standard scheme
    #[must_use]
    pub fn standard() -> Self {
        Self::new(GradingScheme::standard())
    }

    /// The scheme this aggregator was built with
    #[must_use]
    pub const fn scheme(&self) -> &GradingScheme {
        &self.scheme
    }

    /// Compute the final grade and per-category breakdown
    ///
    /// Walks the scheme's categories; input keys the scheme does not name
    /// are ignored, as is input whose shape does not match the category
    /// kind. An averaged category with no entered scores is skipped
    /// entirely. A recorded penalty category always gets an entry, with its
    /// unit count clamped to `max_units` so the impact never exceeds the
    /// configured weight.
    #[must_use]
    pub fn compute(&self, scores: &ScoreSet) -> GradeSummary {
        let mut final_grade = 0.0;
        let mut breakdown = GradeBreakdown::new();

        for spec in &self.scheme.categories {
            let Some(recorded) = scores.get(&spec.name) else {
                continue;
            };

            match (&spec.kind, recorded) {
                (CategoryKind::Averaged { .. }, CategoryScores::Scores(slots)) => {
                    let entered = recorded.entered();
                    if entered.is_empty() {
                        continue;
                    }

                    #[allow(clippy::cast_precision_loss)]
                    let average = entered.iter().sum::<f64>() / entered.len() as f64;
                    let weighted = average * spec.weight;
                    final_grade += weighted;
                    breakdown.insert(
                        spec.name.clone(),
                        CategoryBreakdown::Averaged {
                            scores: slots.clone(),
                            average,
                            weighted,
                        },
                    );
                }
                (CategoryKind::Penalty { max_units }, CategoryScores::Units(units)) => {
                    let units = (*units).min(*max_units);
                    // Full configured weight at max_units, on the same
                    // percentage-point scale as the weighted averages
                    let per_unit = spec.weight * 100.0 / f64::from(*max_units);
                    // Avoid IEEE negative zero (0 × negative per-unit), which
                    // would format as "-0.00" in reports
                    let impact = if units == 0 {
                        0.0
                    } else {
                        f64::from(units) * per_unit
                    };
                    final_grade += impact;
                    breakdown.insert(spec.name.clone(), CategoryBreakdown::Penalty { units, impact });
                }
                // Shape mismatch: not validated here, see scores::validate_ranges
                (CategoryKind::Averaged { .. }, CategoryScores::Units(_))
                | (CategoryKind::Penalty { .. }, CategoryScores::Scores(_)) => {}
            }
        }

        GradeSummary {
            final_grade,
            breakdown,
        }
    }

    /// Solve for the average needed on remaining fixed-count work to reach
    /// `target`, assuming open-ended and penalty categories stay as recorded
    ///
    /// Remaining work is counted from entered (non-`None`) scores, so a
    /// `None` placeholder slot counts as remaining. Returns `None` when no
    /// fixed-count work remains; that is a normal outcome, distinct from a
    /// zero-points-needed result.
    #[must_use]
    pub fn needed_for_target(&self, scores: &ScoreSet, target: f64) -> Option<NeededGrade> {
        let current_grade = self.compute(scores).final_grade;

        let mut remaining = RemainingWeights::new();
        let mut total_share = 0.0;

        for spec in self.scheme.fixed_count_categories() {
            let Some(expected) = spec.expected_count() else {
                continue;
            };
            let entered = scores
                .get(&spec.name)
                .map_or(0, CategoryScores::entered_count);
            #[allow(clippy::cast_possible_truncation)]
            let left = expected.saturating_sub(entered.min(expected as usize) as u32);

            if left > 0 {
                let weight_share = spec.weight * f64::from(left) / f64::from(expected);
                total_share += weight_share;
                remaining.insert(
                    spec.name.clone(),
                    RemainingShare {
                        count: left,
                        weight_share,
                    },
                );
            }
        }

        if remaining.is_empty() || total_share.abs() < f64::EPSILON {
            return None;
        }

        let points_needed = target - current_grade;
        let needed_average = points_needed / total_share;

        Some(NeededGrade {
            current_grade,
            points_needed,
            needed_average,
            remaining,
        })
    }
}
