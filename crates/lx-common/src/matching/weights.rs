use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// One independent scoring dimension. Declaration order is the order in which
/// scores, explanations and risks are reported.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Criterion {
    PracticeArea,
    Experience,
    Reputation,
    Availability,
    Language,
    CostAlignment,
    Geography,
    ComplexityAlignment,
    Responsiveness,
}

impl Criterion {
    pub const ALL: [Criterion; 9] = [
        Criterion::PracticeArea,
        Criterion::Experience,
        Criterion::Reputation,
        Criterion::Availability,
        Criterion::Language,
        Criterion::CostAlignment,
        Criterion::Geography,
        Criterion::ComplexityAlignment,
        Criterion::Responsiveness,
    ];
}

/// Standard weights (0–100 scale)
/// Favors practical fit: budget, language and location carry most of the mass.
pub const STANDARD_WEIGHTS: &[(Criterion, f64)] = &[
    (Criterion::PracticeArea, 0.25),
    (Criterion::Experience, 0.10),
    (Criterion::Reputation, 0.05),
    (Criterion::Availability, 0.10),
    (Criterion::Language, 0.15),
    (Criterion::CostAlignment, 0.20),
    (Criterion::Geography, 0.10),
    (Criterion::Responsiveness, 0.05),
];

/// Extended weights (0–1 scale)
/// Favors expertise: practice area, experience and reviews dominate.
pub const EXTENDED_WEIGHTS: &[(Criterion, f64)] = &[
    (Criterion::PracticeArea, 0.30),
    (Criterion::Experience, 0.25),
    (Criterion::Reputation, 0.20),
    (Criterion::Availability, 0.10),
    (Criterion::Language, 0.05),
    (Criterion::CostAlignment, 0.05),
    (Criterion::Geography, 0.03),
    (Criterion::ComplexityAlignment, 0.02),
];

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("weight table is empty")]
    Empty,
    #[error("weights sum to {sum:.6}, expected 1.0")]
    DoesNotSumToOne { sum: f64 },
    #[error("weight for {criterion:?} must be a finite non-negative number (got {weight})")]
    InvalidWeight { criterion: Criterion, weight: f64 },
    #[error("criterion {criterion:?} is not scored in this mode")]
    Unsupported { criterion: Criterion },
}

/// Criterion → weight mapping for one mode. Iterates in `Criterion` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<Criterion, f64>);

impl WeightTable {
    pub fn from_pairs(pairs: &[(Criterion, f64)]) -> Self {
        Self(pairs.iter().copied().collect())
    }

    pub fn standard() -> Self {
        Self::from_pairs(STANDARD_WEIGHTS)
    }

    pub fn extended() -> Self {
        Self::from_pairs(EXTENDED_WEIGHTS)
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        self.0.get(&criterion).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.0.iter().map(|(criterion, weight)| (*criterion, *weight))
    }

    pub fn criteria(&self) -> impl Iterator<Item = Criterion> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Structural check run once at engine construction.
    pub fn validate(&self, supported: &[Criterion]) -> Result<(), WeightError> {
        if self.0.is_empty() {
            return Err(WeightError::Empty);
        }

        for (criterion, weight) in self.iter() {
            if !supported.contains(&criterion) {
                return Err(WeightError::Unsupported { criterion });
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(WeightError::InvalidWeight { criterion, weight });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightError::DoesNotSumToOne { sum });
        }

        Ok(())
    }
}

impl From<BTreeMap<Criterion, f64>> for WeightTable {
    fn from(value: BTreeMap<Criterion, f64>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let standard_sum = WeightTable::standard().sum();
        let extended_sum = WeightTable::extended().sum();
        assert!((standard_sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((extended_sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn rejects_tables_that_do_not_sum_to_one() {
        let table = WeightTable::from_pairs(&[
            (Criterion::PracticeArea, 0.5),
            (Criterion::Experience, 0.4),
        ]);

        let err = table.validate(&Criterion::ALL).unwrap_err();
        assert!(matches!(err, WeightError::DoesNotSumToOne { .. }));
    }

    #[test]
    fn rejects_negative_and_unsupported_weights() {
        let negative = WeightTable::from_pairs(&[
            (Criterion::PracticeArea, 1.2),
            (Criterion::Experience, -0.2),
        ]);
        assert!(matches!(
            negative.validate(&Criterion::ALL),
            Err(WeightError::InvalidWeight {
                criterion: Criterion::Experience,
                ..
            })
        ));

        let unsupported = WeightTable::from_pairs(&[(Criterion::Responsiveness, 1.0)]);
        assert_eq!(
            unsupported.validate(&[Criterion::PracticeArea]),
            Err(WeightError::Unsupported {
                criterion: Criterion::Responsiveness
            })
        );
    }

    #[test]
    fn iterates_in_declaration_order() {
        let order: Vec<_> = WeightTable::extended().criteria().collect();
        assert_eq!(order.first(), Some(&Criterion::PracticeArea));
        assert_eq!(order.last(), Some(&Criterion::ComplexityAlignment));
    }

    #[test]
    fn serializes_as_snake_case_map() {
        let json = serde_json::to_value(WeightTable::standard()).unwrap();
        assert_eq!(json["cost_alignment"], 0.20);
        assert_eq!(json["practice_area"], 0.25);

        let parsed: WeightTable =
            serde_json::from_str(r#"{"practice_area": 0.6, "experience": 0.4}"#).unwrap();
        assert_eq!(parsed.get(Criterion::Experience), Some(0.4));
    }
}
