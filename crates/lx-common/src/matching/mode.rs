use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::weights::{Criterion, WeightError, WeightTable};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModeKind {
    #[default]
    Standard,
    Extended,
}

impl ModeKind {
    /// Criteria that have a scoring rule in this mode.
    pub fn supported_criteria(self) -> &'static [Criterion] {
        match self {
            ModeKind::Standard => &[
                Criterion::PracticeArea,
                Criterion::Experience,
                Criterion::Reputation,
                Criterion::Availability,
                Criterion::Language,
                Criterion::CostAlignment,
                Criterion::Geography,
                Criterion::Responsiveness,
            ],
            ModeKind::Extended => &[
                Criterion::PracticeArea,
                Criterion::Experience,
                Criterion::Reputation,
                Criterion::Availability,
                Criterion::Language,
                Criterion::CostAlignment,
                Criterion::Geography,
                Criterion::ComplexityAlignment,
            ],
        }
    }
}

/// Scale on which a mode's criterion scores are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    /// 0–100
    Percent,
    /// 0–1
    Unit,
}

impl ScoreScale {
    pub fn max(self) -> f64 {
        match self {
            ScoreScale::Percent => 100.0,
            ScoreScale::Unit => 1.0,
        }
    }

    pub fn clamp(self, raw: f64) -> f64 {
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, self.max())
    }

    /// Maps a clamped score onto 0–1 for weighting and thresholds.
    pub fn normalize(self, score: f64) -> f64 {
        self.clamp(score) / self.max()
    }

    /// Expresses a unit-interval value on this scale.
    pub fn from_unit(self, unit: f64) -> f64 {
        unit * self.max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "value")]
pub enum ConfidencePolicy {
    /// Every candidate gets the same confidence; ranking reduces to total score.
    Constant(f64),
    /// Profile completeness plus score spread, capped at 98.
    DataCompleteness,
}

/// Everything that differs between the two pipelines. The engine itself is
/// mode-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    pub kind: ModeKind,
    pub weights: WeightTable,
    pub scale: ScoreScale,
    /// Output cap after ranking.
    pub max_results: usize,
    /// Totals (0–1) at or below this floor are dropped before truncation.
    pub min_total_score: f64,
    pub confidence: ConfidencePolicy,
    /// Normalized score at or above which a criterion earns an explanation.
    pub strong_threshold: f64,
    /// Normalized score below which a criterion may raise a risk.
    pub weak_threshold: f64,
}

impl Mode {
    pub fn standard() -> Self {
        Self {
            kind: ModeKind::Standard,
            weights: WeightTable::standard(),
            scale: ScoreScale::Percent,
            max_results: 10,
            min_total_score: 0.0,
            confidence: ConfidencePolicy::Constant(100.0),
            strong_threshold: 0.8,
            weak_threshold: 0.5,
        }
    }

    pub fn extended() -> Self {
        Self {
            kind: ModeKind::Extended,
            weights: WeightTable::extended(),
            scale: ScoreScale::Unit,
            max_results: 15,
            min_total_score: 0.4,
            confidence: ConfidencePolicy::DataCompleteness,
            strong_threshold: 0.8,
            weak_threshold: 0.5,
        }
    }

    pub fn for_kind(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Standard => Self::standard(),
            ModeKind::Extended => Self::extended(),
        }
    }

    pub fn with_weights(self, weights: WeightTable) -> Self {
        Self { weights, ..self }
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        self.weights.validate(self.kind.supported_criteria())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_modes_are_valid() {
        assert_eq!(Mode::standard().validate(), Ok(()));
        assert_eq!(Mode::extended().validate(), Ok(()));
    }

    #[test]
    fn extended_weights_are_rejected_in_standard_mode() {
        let mode = Mode::standard().with_weights(WeightTable::extended());
        assert_eq!(
            mode.validate(),
            Err(WeightError::Unsupported {
                criterion: Criterion::ComplexityAlignment
            })
        );
    }

    #[test]
    fn scales_normalize_explicitly() {
        assert_eq!(ScoreScale::Percent.normalize(80.0), 0.8);
        assert_eq!(ScoreScale::Unit.normalize(0.8), 0.8);
        assert_eq!(ScoreScale::Percent.normalize(140.0), 1.0);
        assert_eq!(ScoreScale::Unit.clamp(-0.2), 0.0);
        assert_eq!(ScoreScale::Unit.clamp(f64::NAN), 0.0);
    }

    #[test]
    fn mode_kind_parses_from_cli_strings() {
        assert_eq!("extended".parse::<ModeKind>().unwrap(), ModeKind::Extended);
        assert!("fast".parse::<ModeKind>().is_err());
    }
}
