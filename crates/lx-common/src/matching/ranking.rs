use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    explain::{ExplainContext, Locale, explain},
    mode::{ConfidencePolicy, Mode, ScoreScale},
    scoring::{CriterionScores, ScoringContext, score_candidate},
    weights::{Criterion, WeightTable},
};
use crate::CandidateProfile;

pub const MAX_CONFIDENCE: f64 = 98.0;
const BASE_CONFIDENCE: f64 = 60.0;

/// Everything the aggregator derived for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub scale: ScoreScale,
    /// Clamped raw scores on `scale`.
    pub scores: CriterionScores,
    pub weights: WeightTable,
    /// Weighted sum of normalized scores, 0–1.
    pub total: f64,
    pub confidence: f64,
    pub explanations: Vec<String>,
    pub risk_factors: Vec<String>,
}

impl ScoreBreakdown {
    pub fn evaluate(candidate: &CandidateProfile, ctx: &ScoringContext<'_>, mode: &Mode) -> Self {
        let scores = score_candidate(candidate, ctx, &mode.weights);
        let normalized = normalize(&scores, mode.scale);
        let total = weighted_total(&normalized, &mode.weights);
        let confidence = confidence(mode.confidence, candidate, &normalized);

        let explanation = explain(
            &normalized,
            &ExplainContext {
                candidate,
                criteria: ctx.criteria,
                assessment: ctx.assessment,
                locale: Locale::for_language(&ctx.criteria.preferred_language),
                strong_threshold: mode.strong_threshold,
                weak_threshold: mode.weak_threshold,
            },
        );

        Self {
            scale: mode.scale,
            scores,
            weights: mode.weights.clone(),
            total,
            confidence,
            explanations: explanation.reasons,
            risk_factors: explanation.risks,
        }
    }

    /// total × confidence / 100
    pub fn ranking_key(&self) -> f64 {
        self.total * self.confidence / 100.0
    }

    pub fn normalized_scores(&self) -> BTreeMap<Criterion, f64> {
        normalize(&self.scores, self.scale)
    }
}

pub fn normalize(scores: &CriterionScores, scale: ScoreScale) -> BTreeMap<Criterion, f64> {
    scores
        .iter()
        .map(|(criterion, score)| (*criterion, scale.normalize(*score)))
        .collect()
}

pub fn weighted_total(normalized: &BTreeMap<Criterion, f64>, weights: &WeightTable) -> f64 {
    weights
        .iter()
        .map(|(criterion, weight)| normalized.get(&criterion).copied().unwrap_or(0.0) * weight)
        .sum()
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / count
}

pub fn confidence(
    policy: ConfidencePolicy,
    candidate: &CandidateProfile,
    normalized: &BTreeMap<Criterion, f64>,
) -> f64 {
    match policy {
        ConfidencePolicy::Constant(value) => value,
        ConfidencePolicy::DataCompleteness => {
            let mut confidence = BASE_CONFIDENCE;

            if candidate.has_bio() {
                confidence += 5.0;
            }
            if candidate.has_photo() {
                confidence += 3.0;
            }
            if candidate.rating_count > 10 {
                confidence += 10.0;
            }
            if candidate.rating_count > 50 {
                confidence += 5.0;
            }
            if candidate.years_experience > 5 {
                confidence += 5.0;
            }
            if candidate.hourly_rate_range().is_some() {
                confidence += 7.0;
            }

            let values: Vec<f64> = normalized.values().copied().collect();
            let variance = population_variance(&values);
            if variance < 0.1 {
                confidence += 10.0;
            } else if variance > 0.3 {
                confidence -= 5.0;
            }

            confidence.min(MAX_CONFIDENCE)
        }
    }
}

/// Drops totals at or below the mode floor, stable-sorts by ranking key
/// (input order breaks ties) and truncates to `limit`.
pub fn select_top<T>(
    mut items: Vec<T>,
    mode: &Mode,
    limit: usize,
    breakdown: impl Fn(&T) -> &ScoreBreakdown,
) -> Vec<T> {
    items.retain(|item| breakdown(item).total > mode.min_total_score);
    items.sort_by(|a, b| {
        breakdown(b)
            .ranking_key()
            .total_cmp(&breakdown(a).ranking_key())
    });
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(total: f64, confidence: f64) -> ScoreBreakdown {
        ScoreBreakdown {
            scale: ScoreScale::Unit,
            scores: CriterionScores::new(),
            weights: WeightTable::extended(),
            total,
            confidence,
            explanations: Vec::new(),
            risk_factors: Vec::new(),
        }
    }

    #[test]
    fn weighted_total_uses_normalized_scores() {
        let mut scores = CriterionScores::new();
        for criterion in WeightTable::standard().criteria() {
            scores.insert(criterion, 50.0);
        }
        let normalized = normalize(&scores, ScoreScale::Percent);
        let total = weighted_total(&normalized, &WeightTable::standard());
        assert!((total - 0.5).abs() < 1e-9);
    }

    #[test]
    fn data_completeness_confidence_is_capped() {
        let candidate = CandidateProfile {
            bio: Some("bio".into()),
            profile_photo_url: Some("https://example.test/p.png".into()),
            rating_count: 80,
            years_experience: 20,
            hourly_rate_min: Some(150.0),
            hourly_rate_max: Some(250.0),
            ..CandidateProfile::default()
        };
        let uniform: BTreeMap<_, _> = [(Criterion::PracticeArea, 0.9), (Criterion::Experience, 0.9)]
            .into_iter()
            .collect();

        assert_eq!(
            confidence(ConfidencePolicy::DataCompleteness, &candidate, &uniform),
            98.0
        );
        assert_eq!(
            confidence(ConfidencePolicy::Constant(100.0), &candidate, &uniform),
            100.0
        );
    }

    #[test]
    fn sparse_profile_confidence() {
        let candidate = CandidateProfile::default();
        let spread: BTreeMap<_, _> = [(Criterion::PracticeArea, 1.0), (Criterion::Experience, 0.0)]
            .into_iter()
            .collect();

        // variance 0.25: neither bonus nor penalty
        assert_eq!(
            confidence(ConfidencePolicy::DataCompleteness, &candidate, &spread),
            60.0
        );
    }

    #[test]
    fn select_top_floors_sorts_and_truncates() {
        let mode = Mode::extended();
        let items = vec![
            ("a", breakdown(0.9, 60.0)),
            ("b", breakdown(0.35, 98.0)),
            ("c", breakdown(0.8, 90.0)),
            ("d", breakdown(0.4, 98.0)),
            ("e", breakdown(0.63, 100.0)),
        ];

        let ranked = select_top(items, &mode, 2, |(_, breakdown)| breakdown);
        let ids: Vec<_> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["c", "e"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let mode = Mode::standard();
        let items = vec![
            ("first", breakdown(0.5, 100.0)),
            ("second", breakdown(0.5, 100.0)),
            ("third", breakdown(0.5, 100.0)),
        ];

        let ranked = select_top(items, &mode, 10, |(_, breakdown)| breakdown);
        let ids: Vec<_> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
