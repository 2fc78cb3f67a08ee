#![allow(async_fn_in_trait)]

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CandidateProfile;

/// Narrowing applied on top of the eligibility rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilters {
    /// Only candidates who speak this language.
    #[serde(default)]
    pub language: Option<String>,
    /// Only candidates practicing in this province.
    #[serde(default)]
    pub province: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read candidate snapshot {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse candidate snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("candidate directory unavailable: {0}")]
    Unavailable(String),
}

/// Source of the candidate pool for a match request.
///
/// Implementations return only active, verified candidates that list the
/// requested practice area.
pub trait CandidateDirectory: Send + Sync {
    async fn fetch_eligible_candidates(
        &self,
        practice_area_id: &str,
        filters: &CandidateFilters,
    ) -> Result<Vec<CandidateProfile>, DirectoryError>;
}

pub fn is_eligible(
    candidate: &CandidateProfile,
    practice_area_id: &str,
    filters: &CandidateFilters,
) -> bool {
    if !candidate.is_active || !candidate.is_verified {
        return false;
    }
    if candidate.practice_area(practice_area_id).is_none() {
        return false;
    }
    if let Some(language) = filters.language.as_deref() {
        if !candidate.speaks(language) {
            return false;
        }
    }
    if let Some(province) = filters.province.as_deref() {
        let matches = candidate
            .province
            .as_deref()
            .is_some_and(|own| own.trim().eq_ignore_ascii_case(province.trim()));
        if !matches {
            return false;
        }
    }
    true
}

/// Directory over a snapshot held in memory. Snapshot order is preserved, so
/// ranking ties resolve the same way on every run.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    candidates: Vec<CandidateProfile>,
}

impl InMemoryDirectory {
    pub fn new(candidates: Vec<CandidateProfile>) -> Self {
        Self { candidates }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DirectoryError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DirectoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateDirectory for InMemoryDirectory {
    async fn fetch_eligible_candidates(
        &self,
        practice_area_id: &str,
        filters: &CandidateFilters,
    ) -> Result<Vec<CandidateProfile>, DirectoryError> {
        let eligible: Vec<_> = self
            .candidates
            .iter()
            .filter(|candidate| is_eligible(candidate, practice_area_id, filters))
            .cloned()
            .collect();

        debug!(
            practice_area_id,
            snapshot = self.candidates.len(),
            eligible = eligible.len(),
            "fetched eligible candidates"
        );
        Ok(eligible)
    }
}
