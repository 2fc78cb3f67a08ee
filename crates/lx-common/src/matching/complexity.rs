//! Keyword heuristic that assigns a complexity tier to a case description.
//!
//! Keyword groups are scanned in the fixed order very_complex → complex →
//! moderate → simple, and every hit overwrites the tier. The reported tier is
//! therefore the tier of the *last* matching group in that order, not the most
//! severe one: "class action ... small claims" classifies as `Simple`. The
//! overwrite is ranking-visible and kept as-is pending product review.

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplexityTier {
    #[default]
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityTier {
    /// Years of general experience expected for a case of this tier.
    pub fn required_years(self) -> f64 {
        match self {
            ComplexityTier::Simple => 1.0,
            ComplexityTier::Moderate => 3.0,
            ComplexityTier::Complex => 7.0,
            ComplexityTier::VeryComplex => 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityAssessment {
    pub tier: ComplexityTier,
    /// 50–95
    pub confidence: u8,
    pub factors: Vec<String>,
}

const BASE_CONFIDENCE: u8 = 50;
const MAX_CONFIDENCE: u8 = 95;
const KEYWORD_BONUS: u8 = 10;
const DETAIL_BONUS: u8 = 5;
const URGENCY_BONUS: u8 = 5;
const DETAILED_DESCRIPTION_CHARS: usize = 500;

pub const DETAILED_DESCRIPTION_FACTOR: &str = "detailed description";
pub const TIME_SENSITIVE_FACTOR: &str = "time-sensitive";

/// Scan order is part of the contract (see module docs).
const KEYWORD_GROUPS: &[(ComplexityTier, &[&str])] = &[
    (
        ComplexityTier::VeryComplex,
        &[
            "class action",
            "securities fraud",
            "international",
            "multi-jurisdictional",
            "appellate court",
            "constitutional",
            "precedent-setting",
            "regulatory investigation",
        ],
    ),
    (
        ComplexityTier::Complex,
        &[
            "corporate merger",
            "intellectual property",
            "employment discrimination",
            "medical malpractice",
            "construction defect",
            "environmental liability",
            "tax audit",
            "bankruptcy",
            "custody battle",
        ],
    ),
    (
        ComplexityTier::Moderate,
        &[
            "contract dispute",
            "personal injury",
            "property damage",
            "employment termination",
            "landlord tenant",
            "insurance claim",
            "small business",
            "estate planning",
        ],
    ),
    (
        ComplexityTier::Simple,
        &[
            "traffic violation",
            "name change",
            "will preparation",
            "power of attorney",
            "incorporation",
            "lease review",
            "debt collection",
            "small claims",
        ],
    ),
];

const URGENCY_WORDS: &[&str] = &["urgent", "immediate"];

pub fn classify(description: &str) -> ComplexityAssessment {
    let text = description.to_lowercase();
    let mut tier = ComplexityTier::Simple;
    let mut factors = Vec::new();
    let mut confidence = BASE_CONFIDENCE;

    for (group_tier, keywords) in KEYWORD_GROUPS {
        for keyword in keywords.iter().filter(|keyword| text.contains(*keyword)) {
            tier = *group_tier;
            factors.push((*keyword).to_string());
            confidence = confidence.saturating_add(KEYWORD_BONUS);
        }
    }

    if text.chars().count() > DETAILED_DESCRIPTION_CHARS {
        factors.push(DETAILED_DESCRIPTION_FACTOR.to_string());
        confidence = confidence.saturating_add(DETAIL_BONUS);
    }

    if URGENCY_WORDS.iter().any(|word| text.contains(word)) {
        factors.push(TIME_SENSITIVE_FACTOR.to_string());
        confidence = confidence.saturating_add(URGENCY_BONUS);
    }

    ComplexityAssessment {
        tier,
        confidence: confidence.min(MAX_CONFIDENCE),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keywords_defaults_to_simple_with_base_confidence() {
        let assessment = classify("I need help reviewing a document.");
        assert_eq!(assessment.tier, ComplexityTier::Simple);
        assert_eq!(assessment.confidence, 50);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn detects_very_complex_cases() {
        let assessment = classify("Potential CLASS ACTION with International investors");
        assert_eq!(assessment.tier, ComplexityTier::VeryComplex);
        assert_eq!(assessment.factors, vec!["class action", "international"]);
        assert_eq!(assessment.confidence, 70);
    }

    #[test]
    fn later_groups_overwrite_earlier_matches() {
        let assessment = classify("class action that started as small claims");
        assert_eq!(assessment.tier, ComplexityTier::Simple);
        assert_eq!(assessment.factors, vec!["class action", "small claims"]);
    }

    #[test]
    fn length_and_urgency_raise_confidence() {
        let long_text = format!("Urgent contract dispute. {}", "details ".repeat(80));
        let assessment = classify(&long_text);

        assert_eq!(assessment.tier, ComplexityTier::Moderate);
        assert_eq!(
            assessment.factors,
            vec!["contract dispute", "detailed description", "time-sensitive"]
        );
        assert_eq!(assessment.confidence, 70);
    }

    #[test]
    fn confidence_is_capped() {
        let text = "class action securities fraud international multi-jurisdictional \
                    appellate court constitutional urgent";
        let assessment = classify(text);
        assert_eq!(assessment.confidence, 95);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "Custody battle involving an international relocation, immediate hearing";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn required_years_grow_with_tier() {
        let years: Vec<_> = [
            ComplexityTier::Simple,
            ComplexityTier::Moderate,
            ComplexityTier::Complex,
            ComplexityTier::VeryComplex,
        ]
        .iter()
        .map(|tier| tier.required_years())
        .collect();
        assert_eq!(years, vec![1.0, 3.0, 7.0, 12.0]);
    }
}
