use serde::{Deserialize, Serialize};

use crate::{CaseCriteria, directory::CandidateFilters, matching::ModeKind};

/// Match request handed to [`crate::service::MatchService`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Generated when absent.
    #[serde(default)]
    pub match_request_id: Option<String>,
    pub criteria: CaseCriteria,
    #[serde(default)]
    pub mode: ModeKind,
    /// Lowers the mode's result cap; never raises it.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub filters: CandidateFilters,
}

impl MatchRequest {
    pub fn new(criteria: CaseCriteria, mode: ModeKind) -> Self {
        Self {
            criteria,
            mode,
            ..Self::default()
        }
    }
}
