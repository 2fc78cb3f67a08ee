use serde::{Deserialize, Serialize};
use tracing::debug;

use super::complexity::ComplexityTier;
use crate::{CandidateProfile, Urgency};

pub const DEFAULT_CURRENCY: &str = "CAD";

const BASE_COST_MIN: f64 = 1000.0;
const BASE_COST_MAX: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: u64,
    pub max: u64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
    pub unit: DurationUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub cost: CostRange,
    pub duration: DurationRange,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("hourly rate must be a finite non-negative number (got {0})")]
    InvalidRate(f64),
    #[error("hourly rate min {min} exceeds max {max}")]
    InvertedRates { min: f64, max: f64 },
}

fn cost_multipliers(tier: ComplexityTier) -> (f64, f64) {
    match tier {
        ComplexityTier::Simple => (0.5, 0.7),
        ComplexityTier::Moderate => (1.0, 1.5),
        ComplexityTier::Complex => (2.0, 4.0),
        ComplexityTier::VeryComplex => (5.0, 15.0),
    }
}

fn estimated_hours(tier: ComplexityTier) -> (f64, f64) {
    match tier {
        ComplexityTier::Simple => (5.0, 15.0),
        ComplexityTier::Moderate => (15.0, 40.0),
        ComplexityTier::Complex => (40.0, 120.0),
        ComplexityTier::VeryComplex => (120.0, 500.0),
    }
}

fn base_duration(tier: ComplexityTier) -> DurationRange {
    let (min, max, unit) = match tier {
        ComplexityTier::Simple => (1, 4, DurationUnit::Weeks),
        ComplexityTier::Moderate => (1, 3, DurationUnit::Months),
        ComplexityTier::Complex => (3, 12, DurationUnit::Months),
        ComplexityTier::VeryComplex => (6, 24, DurationUnit::Months),
    };
    DurationRange { min, max, unit }
}

/// Average of a published hourly range, or `Ok(None)` when the range is not
/// published.
pub fn average_rate(candidate: &CandidateProfile) -> Result<Option<f64>, EstimateError> {
    let Some((min, max)) = candidate.hourly_rate_range() else {
        return Ok(None);
    };

    for rate in [min, max] {
        if !rate.is_finite() || rate < 0.0 {
            return Err(EstimateError::InvalidRate(rate));
        }
    }
    if min > max {
        return Err(EstimateError::InvertedRates { min, max });
    }

    Ok(Some((min + max) / 2.0))
}

/// Cost and duration estimates for one ranked candidate.
#[derive(Debug, Clone)]
pub struct Estimator {
    currency: String,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl Estimator {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn estimate(
        &self,
        candidate: &CandidateProfile,
        tier: ComplexityTier,
        urgency: Urgency,
    ) -> Estimate {
        Estimate {
            cost: self.estimate_cost(candidate, tier),
            duration: estimate_duration(tier, urgency),
        }
    }

    /// Never fails: unusable rate data degrades to the tier's base range.
    pub fn estimate_cost(&self, candidate: &CandidateProfile, tier: ComplexityTier) -> CostRange {
        let (min_multiplier, max_multiplier) = cost_multipliers(tier);
        let mut min = BASE_COST_MIN * min_multiplier;
        let mut max = BASE_COST_MAX * max_multiplier;

        let average = average_rate(candidate).unwrap_or_else(|err| {
            debug!(candidate_id = %candidate.id, error = %err, "ignoring hourly rates in cost estimate");
            None
        });

        if let Some(average) = average {
            let (hours_min, hours_max) = estimated_hours(tier);
            min = min.max(average * hours_min);
            max = max.max(average * hours_max);
        }

        CostRange {
            min: min.round() as u64,
            max: max.round() as u64,
            currency: self.currency.clone(),
        }
    }
}

pub fn estimate_duration(tier: ComplexityTier, urgency: Urgency) -> DurationRange {
    let base = base_duration(tier);
    if urgency != Urgency::Immediate {
        return base;
    }

    // floor(x * 0.7) and floor(x * 0.8) in integer arithmetic
    DurationRange {
        min: (base.min * 7 / 10).max(1),
        max: base.max * 8 / 10,
        unit: base.unit,
    }
}
