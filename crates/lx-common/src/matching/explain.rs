//! Human-readable reasons and risk flags for a scored candidate.
//!
//! [`explain`] is a pure reducer over normalized (0–1) scores: the same inputs
//! always produce the same lines in the same order. Lines follow `Criterion`
//! declaration order, then candidate-flag lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    complexity::{ComplexityAssessment, ComplexityTier},
    weights::Criterion,
};
use crate::{CandidateProfile, CaseCriteria};

const FEW_REVIEWS: u32 = 5;
const VERY_COMPLEX_MIN_YEARS: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    French,
}

impl Locale {
    pub fn for_language(language: &str) -> Self {
        if language.trim().eq_ignore_ascii_case("fr") {
            Locale::French
        } else {
            Locale::English
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExplainContext<'a> {
    pub candidate: &'a CandidateProfile,
    pub criteria: &'a CaseCriteria,
    pub assessment: &'a ComplexityAssessment,
    pub locale: Locale,
    pub strong_threshold: f64,
    pub weak_threshold: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub reasons: Vec<String>,
    pub risks: Vec<String>,
}

pub fn explain(normalized: &BTreeMap<Criterion, f64>, ctx: &ExplainContext<'_>) -> Explanation {
    let candidate = ctx.candidate;
    let mut reasons = Vec::new();
    let mut risks = Vec::new();

    for (criterion, score) in normalized {
        if *score >= ctx.strong_threshold {
            reasons.push(reason_line(*criterion, ctx));
        }
        if *score < ctx.weak_threshold {
            if let Some(line) = weak_line(*criterion, ctx.locale) {
                risks.push(line.to_string());
            }
        }
    }

    if candidate.free_consultation {
        reasons.push(
            match ctx.locale {
                Locale::English => "Free consultation offered",
                Locale::French => "Consultation gratuite offerte",
            }
            .to_string(),
        );
    }

    if candidate.rating_count < FEW_REVIEWS {
        risks.push(
            match ctx.locale {
                Locale::English => "Few client reviews available",
                Locale::French => "Peu d'évaluations clients disponibles",
            }
            .to_string(),
        );
    }

    if !candidate.has_bio() && !candidate.has_photo() {
        risks.push(
            match ctx.locale {
                Locale::English => "Incomplete profile",
                Locale::French => "Profil incomplet",
            }
            .to_string(),
        );
    }

    if ctx.assessment.tier == ComplexityTier::VeryComplex
        && candidate.years_experience < VERY_COMPLEX_MIN_YEARS
    {
        risks.push(
            match ctx.locale {
                Locale::English => "Very complex case that calls for more experience",
                Locale::French => "Cas très complexe nécessitant plus d'expérience",
            }
            .to_string(),
        );
    }

    Explanation { reasons, risks }
}

fn reason_line(criterion: Criterion, ctx: &ExplainContext<'_>) -> String {
    let candidate = ctx.candidate;
    let primary = candidate
        .practice_area(&ctx.criteria.practice_area_id)
        .is_some_and(|area| area.is_primary);

    match (criterion, ctx.locale) {
        (Criterion::PracticeArea, Locale::English) if primary => {
            "Specializes in this area of law as primary practice".into()
        }
        (Criterion::PracticeArea, Locale::English) => "Specializes in this area of law".into(),
        (Criterion::PracticeArea, Locale::French) if primary => {
            "Expert dans ce domaine juridique, spécialité principale".into()
        }
        (Criterion::PracticeArea, Locale::French) => "Expert dans ce domaine juridique".into(),
        (Criterion::Experience, Locale::English) => {
            format!("{} years of experience", candidate.years_experience)
        }
        (Criterion::Experience, Locale::French) => {
            format!("{} années d'expérience", candidate.years_experience)
        }
        (Criterion::Reputation, Locale::English) => {
            format!("Highly rated ({:.1}/5)", candidate.rating_average)
        }
        (Criterion::Reputation, Locale::French) => {
            format!("Excellentes évaluations ({:.1}/5)", candidate.rating_average)
        }
        (Criterion::Availability, Locale::English) => "Available quickly".into(),
        (Criterion::Availability, Locale::French) => "Disponible rapidement".into(),
        (Criterion::Language, locale) => {
            language_line(&ctx.criteria.preferred_language, locale)
        }
        (Criterion::CostAlignment, Locale::English) => "Rates align well with your budget".into(),
        (Criterion::CostAlignment, Locale::French) => "Tarifs alignés avec votre budget".into(),
        (Criterion::Geography, Locale::English) => "Located in your area".into(),
        (Criterion::Geography, Locale::French) => "Situé dans votre région".into(),
        (Criterion::ComplexityAlignment, Locale::English) => {
            "Experience suited to the complexity of your case".into()
        }
        (Criterion::ComplexityAlignment, Locale::French) => {
            "Expérience adaptée à la complexité du dossier".into()
        }
        (Criterion::Responsiveness, Locale::English) => "Responds quickly to clients".into(),
        (Criterion::Responsiveness, Locale::French) => "Répond rapidement aux clients".into(),
    }
}

fn language_line(code: &str, locale: Locale) -> String {
    let code = code.trim().to_lowercase();
    match (code.as_str(), locale) {
        ("fr", Locale::English) => "Practices in French".into(),
        ("en", Locale::English) => "Practices in English".into(),
        (other, Locale::English) => format!("Practices in your language ({other})"),
        ("fr", Locale::French) => "Pratique en français".into(),
        ("en", Locale::French) => "Pratique en anglais".into(),
        (other, Locale::French) => format!("Pratique dans votre langue ({other})"),
    }
}

fn weak_line(criterion: Criterion, locale: Locale) -> Option<&'static str> {
    let line = match (criterion, locale) {
        (Criterion::Experience, Locale::English) => "Limited experience for this type of case",
        (Criterion::Experience, Locale::French) => "Expérience limitée pour ce type de cas",
        (Criterion::Availability, Locale::English) => "Limited availability",
        (Criterion::Availability, Locale::French) => "Disponibilité limitée",
        (Criterion::Language, Locale::English) => "Does not practice in your preferred language",
        (Criterion::Language, Locale::French) => "Ne pratique pas dans votre langue préférée",
        (Criterion::CostAlignment, Locale::English) => "Fees may not fit your budget",
        (Criterion::CostAlignment, Locale::French) => "Honoraires possiblement hors budget",
        _ => return None,
    };
    Some(line)
}
