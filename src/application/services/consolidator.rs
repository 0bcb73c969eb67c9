//! # Consolidator
//!
//! Merges selection, matching and pricing into one immutable
//! [`ResponseRecord`].
//!
//! Overall compliance is the quantity-weighted average of each
//! requirement's top match percentage. Requirements without a viable match
//! contribute 0. The recommendation label is derived from
//! [`RecommendationThresholds`]:
//!
//! | Condition | Label |
//! |-----------|-------|
//! | compliance ≥ `recommended_min` and margin > 0 | recommended |
//! | compliance ≥ `partial_min` | recommended with gaps |
//! | otherwise | not recommended |

use crate::application::services::estimator::PriceBreakdown;
use crate::application::services::matcher::MatchResult;
use crate::application::services::selector::{Exclusion, ScoredSolicitation, SelectionOutcome};
use crate::domain::entities::solicitation::Solicitation;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{round_score, Money, RecommendationLabel, RequirementId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;
use uuid::Uuid;

/// Compliance thresholds for the recommendation label, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    /// Minimum compliance for "recommended".
    pub recommended_min: f64,
    /// Minimum compliance for "recommended with gaps".
    pub partial_min: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            recommended_min: 80.0,
            partial_min: 50.0,
        }
    }
}

impl RecommendationThresholds {
    /// Creates thresholds.
    #[must_use]
    pub fn new(recommended_min: f64, partial_min: f64) -> Self {
        Self {
            recommended_min,
            partial_min,
        }
    }

    /// Validates the thresholds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` unless `0 ≤ partial_min ≤ recommended_min ≤ 100`.
    pub fn validate(&self) -> DomainResult<()> {
        let ordered = self.partial_min.is_finite()
            && self.recommended_min.is_finite()
            && 0.0 <= self.partial_min
            && self.partial_min <= self.recommended_min
            && self.recommended_min <= 100.0;
        if ordered {
            Ok(())
        } else {
            Err(DomainError::config(format!(
                "recommendation thresholds must satisfy 0 <= partial ({}) <= recommended ({}) <= 100",
                self.partial_min, self.recommended_min
            )))
        }
    }

    /// Derives the label for a compliance percentage and aggregate margin.
    #[must_use]
    pub fn label(&self, compliance: f64, total_margin: Money) -> RecommendationLabel {
        if compliance >= self.recommended_min && !total_margin.is_zero() {
            RecommendationLabel::Recommended
        } else if compliance >= self.partial_min {
            RecommendationLabel::RecommendedWithGaps
        } else {
            RecommendationLabel::NotRecommended
        }
    }
}

/// Final output of one pipeline run. Constructed only by [`Consolidator`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRecord {
    response_id: Uuid,
    evaluation_date: NaiveDate,
    solicitation: Option<Solicitation>,
    selection: Vec<ScoredSolicitation>,
    exclusions: Vec<Exclusion>,
    matches: Vec<MatchResult>,
    pricing: PriceBreakdown,
    overall_compliance: f64,
    recommendation: RecommendationLabel,
    gaps: Vec<RequirementId>,
    items_matched: usize,
}

impl ResponseRecord {
    /// Deterministic id derived from the solicitation and evaluation date.
    #[must_use]
    #[inline]
    pub fn response_id(&self) -> Uuid {
        self.response_id
    }

    /// Date the run evaluated deadlines against.
    #[must_use]
    #[inline]
    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    /// The chosen solicitation, if any candidate was eligible.
    #[must_use]
    #[inline]
    pub fn solicitation(&self) -> Option<&Solicitation> {
        self.solicitation.as_ref()
    }

    /// Ranked scores of every eligible candidate.
    #[must_use]
    #[inline]
    pub fn selection(&self) -> &[ScoredSolicitation] {
        &self.selection
    }

    /// Candidates excluded by the selector.
    #[must_use]
    #[inline]
    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// Match results, one per requirement of the chosen solicitation.
    #[must_use]
    #[inline]
    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    /// Price breakdown of the matched lines.
    #[must_use]
    #[inline]
    pub fn pricing(&self) -> &PriceBreakdown {
        &self.pricing
    }

    /// Quantity-weighted compliance percentage, 0–100.
    #[must_use]
    #[inline]
    pub fn overall_compliance(&self) -> f64 {
        self.overall_compliance
    }

    /// Recommendation label.
    #[must_use]
    #[inline]
    pub fn recommendation(&self) -> RecommendationLabel {
        self.recommendation
    }

    /// Requirements with no viable match.
    #[must_use]
    #[inline]
    pub fn gaps(&self) -> &[RequirementId] {
        &self.gaps
    }

    /// Number of requirements with at least one viable match.
    #[must_use]
    #[inline]
    pub fn items_matched(&self) -> usize {
        self.items_matched
    }

    /// Share of requirements matched, in percent. 0 when there are none.
    #[must_use]
    pub fn match_success_rate(&self) -> f64 {
        if self.matches.is_empty() {
            0.0
        } else {
            round_score(self.items_matched as f64 / self.matches.len() as f64 * 100.0)
        }
    }

    /// Aggregate margin across priced lines.
    #[must_use]
    pub fn total_margin(&self) -> Money {
        self.pricing.total_margin
    }

    /// Grand total across priced lines.
    #[must_use]
    pub fn total(&self) -> Money {
        self.pricing.total
    }
}

impl fmt::Display for ResponseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self
            .solicitation
            .as_ref()
            .map_or("none", |s| s.id().as_str());
        write!(
            f,
            "Response {} for {}: {:.2}% compliance, total {}, {}",
            self.response_id, id, self.overall_compliance, self.pricing.total, self.recommendation
        )
    }
}

/// Builds the response record.
#[derive(Debug, Clone)]
pub struct Consolidator {
    thresholds: RecommendationThresholds,
}

impl Consolidator {
    /// Creates a consolidator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the thresholds are invalid.
    pub fn new(thresholds: RecommendationThresholds) -> DomainResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Returns the thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &RecommendationThresholds {
        &self.thresholds
    }

    /// Merges the component outputs into a record.
    #[must_use]
    pub fn consolidate(
        &self,
        selection: SelectionOutcome,
        matches: Vec<MatchResult>,
        pricing: PriceBreakdown,
    ) -> ResponseRecord {
        let SelectionOutcome {
            evaluation_date,
            ranked,
            excluded,
        } = selection;
        let solicitation = ranked.first().map(|s| s.solicitation.clone());

        let overall_compliance = overall_compliance(&matches);
        let recommendation = if solicitation.is_some() {
            self.thresholds.label(overall_compliance, pricing.total_margin)
        } else {
            RecommendationLabel::NotRecommended
        };
        let gaps: Vec<RequirementId> = matches
            .iter()
            .filter(|m| m.is_gap())
            .map(|m| m.requirement_id.clone())
            .collect();
        let items_matched = matches.len() - gaps.len();

        let subject = solicitation
            .as_ref()
            .map_or("none", |s| s.id().as_str());
        let response_id = Uuid::new_v5(
            &Uuid::NAMESPACE_OID,
            format!("rfp-engine/{subject}/{evaluation_date}").as_bytes(),
        );

        info!(
            response_id = %response_id,
            solicitation = subject,
            compliance = overall_compliance,
            gaps = gaps.len(),
            total = %pricing.total,
            recommendation = %recommendation,
            "response consolidated"
        );

        ResponseRecord {
            response_id,
            evaluation_date,
            solicitation,
            selection: ranked,
            exclusions: excluded,
            matches,
            pricing,
            overall_compliance,
            recommendation,
            gaps,
            items_matched,
        }
    }
}

/// Quantity-weighted average of top match percentages; 0 when empty.
fn overall_compliance(matches: &[MatchResult]) -> f64 {
    let total_quantity: f64 = matches.iter().map(|m| m.quantity as f64).sum();
    if total_quantity <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = matches
        .iter()
        .map(|m| m.quantity as f64 * m.top_match_percentage())
        .sum();
    round_score(weighted / total_quantity).clamp(0.0, 100.0)
}
