pub mod api;
pub mod config;
pub mod directory;
pub mod logging;
pub mod matching;
pub mod proposals;
pub mod run_id;
pub mod service;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// How the client intends to pay for the engagement.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BudgetType {
    Hourly,
    Fixed,
    Contingency,
    #[default]
    Flexible,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Urgency {
    Immediate,
    WithinWeek,
    WithinMonth,
    #[default]
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClientType {
    Individual,
    SmallBusiness,
    Corporation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Busy,
    Unavailable,
}

/// Case request submitted by a prospective client. Validated at the caller
/// boundary; the engine treats it as read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseCriteria {
    pub practice_area_id: String,
    pub case_description: String,
    #[serde(default)]
    pub budget_type: BudgetType,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub urgency: Urgency,
    pub preferred_language: String,
    /// "City" or "City, Region" as typed by the client.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub client_type: Option<ClientType>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriteriaError {
    #[error("practice_area_id must not be empty")]
    EmptyPracticeArea,
    #[error("preferred_language must not be empty")]
    EmptyLanguage,
    #[error("{field} must be a non-negative number (got {value})")]
    InvalidBudget { field: &'static str, value: f64 },
    #[error("budget_min {min} exceeds budget_max {max}")]
    InvertedBudget { min: f64, max: f64 },
}

impl CaseCriteria {
    /// Business-rule validation for the request boundary. The engine itself
    /// never calls this.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if self.practice_area_id.trim().is_empty() {
            return Err(CriteriaError::EmptyPracticeArea);
        }
        if self.preferred_language.trim().is_empty() {
            return Err(CriteriaError::EmptyLanguage);
        }

        for (field, value) in [("budget_min", self.budget_min), ("budget_max", self.budget_max)] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(CriteriaError::InvalidBudget { field, value });
                }
            }
        }

        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if min > max {
                return Err(CriteriaError::InvertedBudget { min, max });
            }
        }

        Ok(())
    }
}

/// Years spent in one practice area, as reported by the directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeAreaExperience {
    pub practice_area_id: String,
    #[serde(default)]
    pub years_experience: u32,
    #[serde(default)]
    pub is_primary: bool,
}

/// Read-only practitioner snapshot fetched once per matching run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub id: String,
    pub display_name: String,
    pub practice_areas: Vec<PracticeAreaExperience>,
    pub years_experience: u32,
    pub rating_average: f64,
    pub rating_count: u32,
    pub availability_status: AvailabilityStatus,
    /// Accepted matches inside the 30-day lookback window.
    pub recent_case_load: u32,
    pub has_open_calendar: bool,
    pub avg_response_hours: Option<f64>,
    pub languages: Vec<String>,
    pub fixed_fee_available: bool,
    pub contingency_available: bool,
    pub free_consultation: bool,
    pub hourly_rate_min: Option<f64>,
    pub hourly_rate_max: Option<f64>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub bio: Option<String>,
    pub profile_photo_url: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
}

impl CandidateProfile {
    pub fn practice_area(&self, practice_area_id: &str) -> Option<&PracticeAreaExperience> {
        self.practice_areas
            .iter()
            .find(|area| area.practice_area_id == practice_area_id)
    }

    /// Both ends of the hourly range, only when both are published.
    pub fn hourly_rate_range(&self) -> Option<(f64, f64)> {
        match (self.hourly_rate_min, self.hourly_rate_max) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    pub fn average_hourly_rate(&self) -> Option<f64> {
        self.hourly_rate_range().map(|(min, max)| (min + max) / 2.0)
    }

    pub fn has_bio(&self) -> bool {
        self.bio.as_deref().is_some_and(|bio| !bio.trim().is_empty())
    }

    pub fn has_photo(&self) -> bool {
        self.profile_photo_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn speaks(&self, language: &str) -> bool {
        let wanted = language.trim();
        self.languages
            .iter()
            .any(|spoken| spoken.trim().eq_ignore_ascii_case(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> CaseCriteria {
        CaseCriteria {
            practice_area_id: "family-law".into(),
            case_description: "custody".into(),
            preferred_language: "en".into(),
            ..CaseCriteria::default()
        }
    }

    #[test]
    fn validate_accepts_minimal_request() {
        assert_eq!(criteria().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_and_inverted_budgets() {
        let mut request = criteria();
        request.budget_min = Some(-5.0);
        assert!(matches!(
            request.validate(),
            Err(CriteriaError::InvalidBudget { field: "budget_min", .. })
        ));

        request.budget_min = Some(300.0);
        request.budget_max = Some(200.0);
        assert_eq!(
            request.validate(),
            Err(CriteriaError::InvertedBudget {
                min: 300.0,
                max: 200.0
            })
        );
    }

    #[test]
    fn validate_rejects_blank_practice_area() {
        let mut request = criteria();
        request.practice_area_id = "  ".into();
        assert_eq!(request.validate(), Err(CriteriaError::EmptyPracticeArea));
    }

    #[test]
    fn candidate_helpers_handle_missing_data() {
        let mut candidate = CandidateProfile {
            languages: vec!["FR".into(), "en".into()],
            hourly_rate_min: Some(200.0),
            ..CandidateProfile::default()
        };

        assert!(candidate.speaks("fr"));
        assert!(!candidate.speaks("es"));
        assert_eq!(candidate.average_hourly_rate(), None);

        candidate.hourly_rate_max = Some(300.0);
        assert_eq!(candidate.average_hourly_rate(), Some(250.0));

        candidate.bio = Some("   ".into());
        assert!(!candidate.has_bio());
    }

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&Urgency::WithinWeek).unwrap();
        assert_eq!(json, "\"within_week\"");
        assert_eq!(BudgetType::Contingency.as_ref(), "contingency");
        assert_eq!("hourly".parse::<BudgetType>().unwrap(), BudgetType::Hourly);
    }
}
