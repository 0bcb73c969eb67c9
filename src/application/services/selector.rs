//! # Solicitation Selector
//!
//! Scores and ranks candidate solicitations by business attractiveness.
//!
//! Candidates are first filtered (deadline window, minimum project value)
//! and then scored with a weighted sum of four normalised components:
//!
//! ```text
//! value        = project_value / max(project_value) × 100
//! time         = days_remaining / lookahead_days × 100
//! organization = organization_scores[organization_class]
//! complexity   = (1 / max(n, 1)) / (1 / max(n_min, 1)) × 100   (n = distinct requirements)
//!
//! score = round2(w_value·value + w_time·time + w_org·organization + w_complexity·complexity)
//! ```
//!
//! Ranking is descending by score, then ascending deadline, then ascending
//! solicitation id.

use crate::domain::entities::solicitation::Solicitation;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    round_score, ExclusionReason, Money, OrganizationClass, SolicitationId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Default lookahead window in days.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 90;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weights of the four score components. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionWeights {
    /// Weight of the project value component.
    pub value: f64,
    /// Weight of the remaining time component.
    pub time: f64,
    /// Weight of the organization class component.
    pub organization: f64,
    /// Weight of the complexity component.
    pub complexity: f64,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            value: 0.40,
            time: 0.30,
            organization: 0.20,
            complexity: 0.10,
        }
    }
}

impl SelectionWeights {
    /// Creates a weight set.
    #[must_use]
    pub fn new(value: f64, time: f64, organization: f64, complexity: f64) -> Self {
        Self {
            value,
            time,
            organization,
            complexity,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.value + self.time + self.organization + self.complexity
    }

    fn validate(&self) -> DomainResult<()> {
        let all = [self.value, self.time, self.organization, self.complexity];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DomainError::config(
                "selection weights must be finite and non-negative",
            ));
        }
        if (self.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(DomainError::config(format!(
                "selection weights must sum to 1.0, got {}",
                self.sum()
            )));
        }
        Ok(())
    }
}

fn default_organization_scores() -> BTreeMap<OrganizationClass, f64> {
    BTreeMap::from([
        (OrganizationClass::Public, 100.0),
        (OrganizationClass::Private, 70.0),
    ])
}

/// Configuration for the selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Only deadlines within this many days of the evaluation date are scored.
    pub lookahead_days: i64,
    /// Candidates below this project value are excluded.
    pub min_project_value: Money,
    /// Component weights.
    pub weights: SelectionWeights,
    /// Organization component score per class, 0–100.
    pub organization_scores: BTreeMap<OrganizationClass, f64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            min_project_value: Money::ZERO,
            weights: SelectionWeights::default(),
            organization_scores: default_organization_scores(),
        }
    }
}

impl SelectionConfig {
    /// Sets the lookahead window.
    #[must_use]
    pub fn with_lookahead_days(mut self, days: i64) -> Self {
        self.lookahead_days = days;
        self
    }

    /// Sets the minimum project value.
    #[must_use]
    pub fn with_min_project_value(mut self, value: Money) -> Self {
        self.min_project_value = value;
        self
    }

    /// Sets the component weights.
    #[must_use]
    pub fn with_weights(mut self, weights: SelectionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the organization score of one class.
    #[must_use]
    pub fn with_organization_score(mut self, class: OrganizationClass, score: f64) -> Self {
        self.organization_scores.insert(class, score);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the lookahead window is not positive,
    /// the weights do not sum to 1.0, or an organization score is missing or
    /// outside 0–100.
    pub fn validate(&self) -> DomainResult<()> {
        if self.lookahead_days <= 0 {
            return Err(DomainError::config(format!(
                "lookahead_days must be positive, got {}",
                self.lookahead_days
            )));
        }
        self.weights.validate()?;
        for class in [OrganizationClass::Public, OrganizationClass::Private] {
            match self.organization_scores.get(&class) {
                Some(score) if score.is_finite() && (0.0..=100.0).contains(score) => {}
                Some(score) => {
                    return Err(DomainError::config(format!(
                        "organization score for {class} must be within 0-100, got {score}"
                    )));
                }
                None => {
                    return Err(DomainError::config(format!(
                        "organization score for {class} is not configured"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Per-component scores, each within 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Normalised project value.
    pub value: f64,
    /// Normalised remaining time.
    pub time: f64,
    /// Organization class lookup.
    pub organization: f64,
    /// Normalised inverse requirement count.
    pub complexity: f64,
}

/// A candidate with its rank and score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSolicitation {
    /// The scored candidate.
    pub solicitation: Solicitation,
    /// The rank (1 = best).
    pub rank: usize,
    /// Weighted total, rounded to 2 decimal places.
    pub score: f64,
    /// Component scores before weighting.
    pub breakdown: ScoreBreakdown,
    /// Days from the evaluation date to the deadline.
    pub days_remaining: i64,
}

impl ScoredSolicitation {
    /// Returns true if this is the best candidate (rank 1).
    #[must_use]
    pub fn is_best(&self) -> bool {
        self.rank == 1
    }
}

impl fmt::Display for ScoredSolicitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScoredSolicitation(#{} score={:.2} id={})",
            self.rank,
            self.score,
            self.solicitation.id()
        )
    }
}

/// A candidate that was not scored, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    /// Excluded solicitation.
    pub solicitation_id: SolicitationId,
    /// Why it was excluded.
    pub reason: ExclusionReason,
    /// Days from the evaluation date to the deadline.
    pub days_remaining: i64,
}

/// Result of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOutcome {
    /// Date the candidates were evaluated against.
    pub evaluation_date: NaiveDate,
    /// Scored candidates, best first.
    pub ranked: Vec<ScoredSolicitation>,
    /// Candidates skipped by the filters, in input order.
    pub excluded: Vec<Exclusion>,
}

impl SelectionOutcome {
    /// Returns the best candidate, if any passed the filters.
    #[must_use]
    pub fn best(&self) -> Option<&ScoredSolicitation> {
        self.ranked.first()
    }

    /// Returns true if no candidate passed the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Scores and ranks candidate solicitations.
#[derive(Debug, Clone)]
pub struct Selector {
    config: SelectionConfig,
}

impl Selector {
    /// Creates a selector.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the configuration is invalid.
    pub fn new(config: SelectionConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Filters, scores and ranks the candidates as of the given date.
    ///
    /// An empty input, or one where every candidate is filtered out, yields
    /// an outcome with no ranked entries.
    #[must_use]
    pub fn select(&self, candidates: &[Solicitation], as_of: NaiveDate) -> SelectionOutcome {
        let mut eligible: Vec<(&Solicitation, i64)> = Vec::with_capacity(candidates.len());
        let mut excluded = Vec::new();

        for candidate in candidates {
            let days = candidate.days_until_deadline(as_of);
            let reason = if !(0..=self.config.lookahead_days).contains(&days) {
                Some(ExclusionReason::DeadlineExpired)
            } else if candidate.project_value() < self.config.min_project_value {
                Some(ExclusionReason::ValueTooLow)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    debug!(
                        solicitation = %candidate.id(),
                        reason = %reason,
                        days_remaining = days,
                        "candidate excluded"
                    );
                    excluded.push(Exclusion {
                        solicitation_id: candidate.id().clone(),
                        reason,
                        days_remaining: days,
                    });
                }
                None => eligible.push((candidate, days)),
            }
        }

        let max_value = eligible
            .iter()
            .map(|(s, _)| s.project_value().to_f64())
            .fold(0.0_f64, f64::max);
        let min_requirements = eligible
            .iter()
            .map(|(s, _)| s.distinct_requirement_count().max(1))
            .min()
            .unwrap_or(1);

        let mut ranked: Vec<ScoredSolicitation> = eligible
            .into_iter()
            .map(|(solicitation, days)| {
                let breakdown = self.breakdown(solicitation, days, max_value, min_requirements);
                ScoredSolicitation {
                    solicitation: solicitation.clone(),
                    rank: 0,
                    score: self.weighted_total(&breakdown),
                    breakdown,
                    days_remaining: days,
                }
            })
            .collect();

        ranked.sort_by(compare_scored);
        for (i, entry) in ranked.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        info!(
            candidates = candidates.len(),
            scored = ranked.len(),
            excluded = excluded.len(),
            best = ranked.first().map(|s| s.solicitation.id().as_str()).unwrap_or("-"),
            "selection complete"
        );

        SelectionOutcome {
            evaluation_date: as_of,
            ranked,
            excluded,
        }
    }

    fn breakdown(
        &self,
        solicitation: &Solicitation,
        days: i64,
        max_value: f64,
        min_requirements: usize,
    ) -> ScoreBreakdown {
        let value = if max_value > 0.0 {
            solicitation.project_value().to_f64() / max_value * 100.0
        } else {
            0.0
        };
        let time = days as f64 / self.config.lookahead_days as f64 * 100.0;
        let organization = self
            .config
            .organization_scores
            .get(&solicitation.organization_class())
            .copied()
            .unwrap_or(0.0);
        let requirements = solicitation.distinct_requirement_count().max(1);
        let complexity = min_requirements as f64 / requirements as f64 * 100.0;

        ScoreBreakdown {
            value: value.clamp(0.0, 100.0),
            time: time.clamp(0.0, 100.0),
            organization,
            complexity: complexity.clamp(0.0, 100.0),
        }
    }

    fn weighted_total(&self, b: &ScoreBreakdown) -> f64 {
        let w = &self.config.weights;
        let total = w.value * b.value
            + w.time * b.time
            + w.organization * b.organization
            + w.complexity * b.complexity;
        round_score(total).clamp(0.0, 100.0)
    }
}

/// Score descending, then deadline ascending, then id ascending.
fn compare_scored(a: &ScoredSolicitation, b: &ScoredSolicitation) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            a.solicitation
                .submission_deadline()
                .cmp(&b.solicitation.submission_deadline())
        })
        .then_with(|| a.solicitation.id().cmp(b.solicitation.id()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::solicitation::Requirement;
    use proptest::prelude::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn candidate(
        id: &str,
        days: i64,
        value: u64,
        class: OrganizationClass,
        requirements: usize,
    ) -> Solicitation {
        let reqs = (0..requirements)
            .map(|i| Requirement::builder(format!("R{i}"), "item", 10).build().unwrap());
        Solicitation::builder(
            id,
            "title",
            "org",
            class,
            as_of() + chrono::Duration::days(days),
            Money::from_units(value),
        )
        .requirements(reqs)
        .build()
    }

    fn selector() -> Selector {
        Selector::new(SelectionConfig::default()).unwrap()
    }

    mod config {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(SelectionConfig::default().validate().is_ok());
            let w = SelectionWeights::default();
            assert!((w.sum() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn weights_must_sum_to_one() {
            let config = SelectionConfig::default()
                .with_weights(SelectionWeights::new(0.5, 0.3, 0.2, 0.1));
            assert!(Selector::new(config).unwrap_err().is_config());
        }

        #[test]
        fn negative_weight_rejected() {
            let config = SelectionConfig::default()
                .with_weights(SelectionWeights::new(1.2, -0.2, 0.0, 0.0));
            assert!(Selector::new(config).unwrap_err().is_config());
        }

        #[test]
        fn organization_score_bounds() {
            let config =
                SelectionConfig::default().with_organization_score(OrganizationClass::Private, 120.0);
            assert!(Selector::new(config).unwrap_err().is_config());
        }

        #[test]
        fn lookahead_must_be_positive() {
            let config = SelectionConfig::default().with_lookahead_days(0);
            assert!(Selector::new(config).unwrap_err().is_config());
        }
    }

    mod filtering {
        use super::*;

        #[test]
        fn deadline_at_boundary_included_one_day_past_excluded() {
            let candidates = vec![
                candidate("A", 90, 1_000, OrganizationClass::Public, 1),
                candidate("B", 91, 1_000, OrganizationClass::Public, 1),
            ];
            let outcome = selector().select(&candidates, as_of());
            assert_eq!(outcome.ranked.len(), 1);
            assert_eq!(outcome.ranked[0].solicitation.id().as_str(), "A");
            assert_eq!(outcome.excluded.len(), 1);
            assert_eq!(outcome.excluded[0].reason, ExclusionReason::DeadlineExpired);
            assert_eq!(outcome.excluded[0].days_remaining, 91);
        }

        #[test]
        fn past_deadline_excluded() {
            let candidates = vec![candidate("A", -1, 1_000, OrganizationClass::Public, 1)];
            let outcome = selector().select(&candidates, as_of());
            assert!(outcome.is_empty());
            assert_eq!(outcome.excluded[0].reason, ExclusionReason::DeadlineExpired);
        }

        #[test]
        fn value_too_low_excluded() {
            let sel = Selector::new(
                SelectionConfig::default().with_min_project_value(Money::from_units(5_000)),
            )
            .unwrap();
            let candidates = vec![
                candidate("A", 30, 4_999, OrganizationClass::Public, 1),
                candidate("B", 30, 5_000, OrganizationClass::Public, 1),
            ];
            let outcome = sel.select(&candidates, as_of());
            assert_eq!(outcome.ranked.len(), 1);
            assert_eq!(outcome.excluded[0].reason, ExclusionReason::ValueTooLow);
        }

        #[test]
        fn empty_input_is_not_an_error() {
            let outcome = selector().select(&[], as_of());
            assert!(outcome.best().is_none());
            assert!(outcome.excluded.is_empty());
        }
    }

    mod scoring {
        use super::*;

        #[test]
        fn single_public_candidate_components() {
            let candidates = vec![candidate("A", 45, 1_000, OrganizationClass::Public, 2)];
            let outcome = selector().select(&candidates, as_of());
            let best = outcome.best().unwrap();
            assert!((best.breakdown.value - 100.0).abs() < 1e-9);
            assert!((best.breakdown.time - 50.0).abs() < 1e-9);
            assert!((best.breakdown.organization - 100.0).abs() < 1e-9);
            assert!((best.breakdown.complexity - 100.0).abs() < 1e-9);
            // 0.4*100 + 0.3*50 + 0.2*100 + 0.1*100
            assert!((best.score - 85.0).abs() < 1e-9);
            assert!(best.is_best());
        }

        #[test]
        fn value_and_complexity_are_relative_to_the_set() {
            let candidates = vec![
                candidate("A", 90, 2_000, OrganizationClass::Private, 1),
                candidate("B", 90, 1_000, OrganizationClass::Private, 4),
            ];
            let outcome = selector().select(&candidates, as_of());
            let b = outcome
                .ranked
                .iter()
                .find(|s| s.solicitation.id().as_str() == "B")
                .unwrap();
            assert!((b.breakdown.value - 50.0).abs() < 1e-9);
            assert!((b.breakdown.complexity - 25.0).abs() < 1e-9);
            assert!((b.breakdown.organization - 70.0).abs() < 1e-9);
        }

        #[test]
        fn score_is_rounded_to_two_places() {
            let candidates = vec![
                candidate("A", 30, 3_000, OrganizationClass::Public, 3),
                candidate("B", 7, 1_000, OrganizationClass::Private, 1),
            ];
            let outcome = selector().select(&candidates, as_of());
            for entry in &outcome.ranked {
                assert!(((entry.score * 100.0).round() - entry.score * 100.0).abs() < 1e-6);
            }
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn ties_broken_by_deadline_then_id() {
            let weights = SelectionWeights::new(0.0, 0.0, 1.0, 0.0);
            let sel = Selector::new(SelectionConfig::default().with_weights(weights)).unwrap();
            let candidates = vec![
                candidate("C", 20, 1_000, OrganizationClass::Public, 1),
                candidate("B", 10, 1_000, OrganizationClass::Public, 1),
                candidate("A", 20, 1_000, OrganizationClass::Public, 1),
            ];
            let outcome = sel.select(&candidates, as_of());
            let ids: Vec<_> = outcome
                .ranked
                .iter()
                .map(|s| s.solicitation.id().as_str())
                .collect();
            assert_eq!(ids, vec!["B", "A", "C"]);
            let ranks: Vec<_> = outcome.ranked.iter().map(|s| s.rank).collect();
            assert_eq!(ranks, vec![1, 2, 3]);
        }

        #[test]
        fn higher_score_wins() {
            let candidates = vec![
                candidate("LOW", 10, 100, OrganizationClass::Private, 5),
                candidate("HIGH", 80, 10_000, OrganizationClass::Public, 1),
            ];
            let outcome = selector().select(&candidates, as_of());
            assert_eq!(outcome.best().unwrap().solicitation.id().as_str(), "HIGH");
        }
    }

    fn arb_weights() -> impl Strategy<Value = SelectionWeights> {
        (1u32..100, 1u32..100, 1u32..100, 1u32..100).prop_map(|(a, b, c, d)| {
            let total = f64::from(a + b + c + d);
            let value = f64::from(a) / total;
            let time = f64::from(b) / total;
            let organization = f64::from(c) / total;
            SelectionWeights::new(value, time, organization, 1.0 - value - time - organization)
        })
    }

    proptest! {
        #[test]
        fn scores_bounded_and_order_total(
            weights in arb_weights(),
            specs in prop::collection::vec((0i64..=90, 1u64..1_000_000, any::<bool>(), 0usize..6), 1..12),
        ) {
            let sel = Selector::new(SelectionConfig::default().with_weights(weights)).unwrap();
            let candidates: Vec<_> = specs
                .iter()
                .enumerate()
                .map(|(i, (days, value, public, reqs))| {
                    let class = if *public { OrganizationClass::Public } else { OrganizationClass::Private };
                    candidate(&format!("S{i:02}"), *days, *value, class, *reqs)
                })
                .collect();
            let outcome = sel.select(&candidates, as_of());
            prop_assert_eq!(outcome.ranked.len(), candidates.len());
            for entry in &outcome.ranked {
                prop_assert!((0.0..=100.0).contains(&entry.score));
            }
            for pair in outcome.ranked.windows(2) {
                prop_assert_eq!(compare_scored(&pair[0], &pair[1]), Ordering::Less);
            }
        }
    }
}
