use std::collections::BTreeMap;

use tracing::debug;

use super::{
    complexity::{ComplexityAssessment, ComplexityTier},
    location::{Proximity, evaluate_proximity},
    mode::{ModeKind, ScoreScale},
    weights::{Criterion, WeightTable},
};
use crate::{AvailabilityStatus, BudgetType, CandidateProfile, CaseCriteria, Urgency};

/// Raw per-criterion scores on the mode's scale, already clamped.
pub type CriterionScores = BTreeMap<Criterion, f64>;

/// Per-request inputs shared by every scorer.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub criteria: &'a CaseCriteria,
    pub assessment: &'a ComplexityAssessment,
    pub mode: ModeKind,
    pub scale: ScoreScale,
    pub home_region: &'a str,
}

/// Every scorer computes a unit-interval value; the context scale converts it.
pub type Scorer = fn(&CandidateProfile, &ScoringContext<'_>) -> f64;

pub fn scorer_for(criterion: Criterion) -> Scorer {
    match criterion {
        Criterion::PracticeArea => score_practice_area,
        Criterion::Experience => score_experience,
        Criterion::Reputation => score_reputation,
        Criterion::Availability => score_availability,
        Criterion::Language => score_language,
        Criterion::CostAlignment => score_cost_alignment,
        Criterion::Geography => score_geography,
        Criterion::ComplexityAlignment => score_complexity_alignment,
        Criterion::Responsiveness => score_responsiveness,
    }
}

/// Scores one candidate on every criterion present in `weights`.
pub fn score_candidate(
    candidate: &CandidateProfile,
    ctx: &ScoringContext<'_>,
    weights: &WeightTable,
) -> CriterionScores {
    weights
        .criteria()
        .map(|criterion| {
            let unit = scorer_for(criterion)(candidate, ctx);
            (criterion, ctx.scale.clamp(ctx.scale.from_unit(unit)))
        })
        .collect()
}

pub const NEUTRAL_REPUTATION_STANDARD: f64 = 0.7;
pub const NEUTRAL_REPUTATION_EXTENDED: f64 = 0.5;
pub const NEUTRAL_COST_STANDARD: f64 = 0.8;
pub const NEUTRAL_COST_EXTENDED: f64 = 0.5;
pub const NEUTRAL_GEOGRAPHY: f64 = 0.5;
pub const NEUTRAL_RESPONSIVENESS: f64 = 0.7;

fn score_practice_area(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    let Some(area) = candidate.practice_area(&ctx.criteria.practice_area_id) else {
        return 0.0;
    };
    let years = area.years_experience;

    match ctx.mode {
        ModeKind::Standard => {
            if area.is_primary {
                1.0
            } else if years >= 10 {
                0.9
            } else if years >= 5 {
                0.8
            } else if years >= 3 {
                0.7
            } else {
                0.6
            }
        }
        ModeKind::Extended => {
            let mut score = 0.6;
            if area.is_primary {
                score += 0.3;
            }
            if years >= 10 {
                score += 0.1;
            } else if years >= 5 {
                score += 0.05;
            }
            f64::min(score, 1.0)
        }
    }
}

/// Non-decreasing in the candidate's total years for a fixed tier.
pub fn experience_ratio_score(years: u32, tier: ComplexityTier) -> f64 {
    let years = f64::from(years);
    let required = tier.required_years();

    if years >= required * 2.0 {
        1.0
    } else if years >= required * 1.5 {
        0.9
    } else if years >= required {
        0.8
    } else if years >= required * 0.7 {
        0.6
    } else {
        0.3
    }
}

fn score_experience(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    experience_ratio_score(candidate.years_experience, ctx.assessment.tier)
}

fn score_reputation(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    let reviews = candidate.rating_count;
    if reviews == 0 {
        debug!(candidate_id = %candidate.id, "no reviews; neutral reputation");
        return match ctx.mode {
            ModeKind::Standard => NEUTRAL_REPUTATION_STANDARD,
            ModeKind::Extended => NEUTRAL_REPUTATION_EXTENDED,
        };
    }

    let rating = candidate.rating_average;
    let mut score = if rating >= 4.8 {
        1.0
    } else if rating >= 4.5 {
        0.9
    } else if rating >= 4.0 {
        0.8
    } else if rating >= 3.5 {
        0.6
    } else {
        match ctx.mode {
            ModeKind::Standard => 0.4,
            ModeKind::Extended => 0.3,
        }
    };

    if reviews >= 50 {
        score += 0.05;
    } else if reviews >= 20 {
        score += 0.03;
    } else if reviews >= 10 {
        score += 0.01;
    }

    f64::min(score, 1.0)
}

fn urgency_bonus(urgency: Urgency) -> f64 {
    match urgency {
        Urgency::Immediate => 0.2,
        Urgency::WithinWeek => 0.15,
        Urgency::WithinMonth => 0.1,
        Urgency::Flexible => 0.05,
    }
}

fn score_availability(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    match (candidate.availability_status, ctx.mode) {
        (AvailabilityStatus::Unavailable, _) => 0.0,
        (AvailabilityStatus::Busy, ModeKind::Standard) => 0.5,
        (AvailabilityStatus::Busy, ModeKind::Extended) => 0.3,
        (AvailabilityStatus::Available, ModeKind::Standard) => {
            if candidate.has_open_calendar {
                1.0
            } else {
                0.6
            }
        }
        (AvailabilityStatus::Available, ModeKind::Extended) => {
            let mut score = 0.8 + urgency_bonus(ctx.criteria.urgency);
            if candidate.recent_case_load < 5 {
                score += 0.05;
            } else if candidate.recent_case_load > 15 {
                score -= 0.1;
            }
            f64::min(score, 1.0)
        }
    }
}

fn score_language(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    if candidate.speaks(&ctx.criteria.preferred_language) {
        return 1.0;
    }

    match ctx.mode {
        ModeKind::Standard if !candidate.languages.is_empty() => 0.5,
        ModeKind::Standard => 0.0,
        ModeKind::Extended if candidate.languages.len() > 1 => 0.7,
        ModeKind::Extended => 0.3,
    }
}

fn score_cost_alignment(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    let criteria = ctx.criteria;
    match criteria.budget_type {
        BudgetType::Flexible => 1.0,
        BudgetType::Contingency => eligibility(candidate.contingency_available),
        BudgetType::Fixed => eligibility(candidate.fixed_fee_available),
        BudgetType::Hourly => {
            let neutral = match ctx.mode {
                ModeKind::Standard => NEUTRAL_COST_STANDARD,
                ModeKind::Extended => NEUTRAL_COST_EXTENDED,
            };
            let (Some(average), Some(budget_max)) =
                (candidate.average_hourly_rate(), criteria.budget_max)
            else {
                debug!(candidate_id = %candidate.id, "hourly rate or budget missing; neutral cost score");
                return neutral;
            };

            match ctx.mode {
                ModeKind::Standard => hourly_band_score(average, criteria.budget_min, budget_max),
                ModeKind::Extended => hourly_tier_score(average, budget_max),
            }
        }
    }
}

fn eligibility(offered: bool) -> f64 {
    if offered { 1.0 } else { 0.0 }
}

/// Continuous decay outside the client's band. Undercutting the band is
/// penalised twice as steeply as exceeding it.
fn hourly_band_score(average: f64, budget_min: Option<f64>, budget_max: f64) -> f64 {
    if let Some(min) = budget_min.filter(|min| *min > 0.0) {
        if average < min {
            let pct_below = (min - average) / min;
            return f64::max(0.0, 1.0 - 2.0 * pct_below);
        }
    }

    if average <= budget_max {
        return 1.0;
    }
    if budget_max <= 0.0 {
        return 0.0;
    }

    let pct_above = (average - budget_max) / budget_max;
    f64::max(0.0, 1.0 - pct_above)
}

fn hourly_tier_score(average: f64, budget_max: f64) -> f64 {
    if average <= budget_max {
        1.0
    } else if average <= budget_max * 1.2 {
        0.8
    } else if average <= budget_max * 1.5 {
        0.5
    } else {
        0.2
    }
}

fn score_geography(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    match evaluate_proximity(ctx.criteria.location.as_deref(), candidate, ctx.home_region) {
        Proximity::SameCity => 1.0,
        Proximity::SameRegion => 0.7,
        Proximity::Elsewhere => 0.3,
        Proximity::Unknown => {
            debug!(candidate_id = %candidate.id, "location unknown; neutral geography score");
            NEUTRAL_GEOGRAPHY
        }
    }
}

fn score_complexity_alignment(candidate: &CandidateProfile, ctx: &ScoringContext<'_>) -> f64 {
    let years = candidate.years_experience;
    match ctx.assessment.tier {
        ComplexityTier::Simple => {
            if years >= 1 {
                1.0
            } else {
                0.5
            }
        }
        ComplexityTier::Moderate => {
            if years >= 3 {
                1.0
            } else if years >= 1 {
                0.7
            } else {
                0.3
            }
        }
        ComplexityTier::Complex => {
            if years >= 7 {
                1.0
            } else if years >= 5 {
                0.8
            } else {
                0.4
            }
        }
        ComplexityTier::VeryComplex => {
            if years >= 12 {
                1.0
            } else if years >= 8 {
                0.7
            } else {
                0.3
            }
        }
    }
}

fn score_responsiveness(candidate: &CandidateProfile, _ctx: &ScoringContext<'_>) -> f64 {
    let Some(hours) = candidate
        .avg_response_hours
        .filter(|hours| hours.is_finite() && *hours >= 0.0)
    else {
        return NEUTRAL_RESPONSIVENESS;
    };

    if hours <= 4.0 {
        1.0
    } else if hours <= 12.0 {
        0.9
    } else if hours <= 24.0 {
        0.8
    } else if hours <= 48.0 {
        0.6
    } else {
        0.4
    }
}
