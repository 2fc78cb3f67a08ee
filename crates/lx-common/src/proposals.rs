#![allow(async_fn_in_trait)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::instrument;

use crate::{
    matching::{ENGINE_VERSION, RankedMatch},
    run_id,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Proposed,
    Accepted,
    Declined,
}

/// One persisted proposal: a ranked candidate offered for a match request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub proposal_id: String,
    pub match_request_id: String,
    pub match_run_id: String,
    pub candidate_id: String,
    /// 1-based position in the ranked list.
    pub rank: usize,
    pub total_score: f64,
    pub confidence: f64,
    pub status: ProposalStatus,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
}

impl ProposalRecord {
    pub fn from_ranked(match_request_id: &str, rank: usize, ranked: &RankedMatch) -> Self {
        Self {
            proposal_id: run_id::generate(),
            match_request_id: match_request_id.to_string(),
            match_run_id: run_id::get().to_string(),
            candidate_id: ranked.candidate.id.clone(),
            rank,
            total_score: ranked.breakdown.total,
            confidence: ranked.breakdown.confidence,
            status: ProposalStatus::Proposed,
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProposalError {
    #[error("duplicate proposal for request {match_request_id} and candidate {candidate_id}")]
    Duplicate {
        match_request_id: String,
        candidate_id: String,
    },
    #[error("proposal store unavailable: {0}")]
    Unavailable(String),
}

/// Receives the ranked list for a match request and records one proposal per
/// match, in rank order. Returns the stored records.
pub trait ProposalSink: Send + Sync {
    async fn record_proposals(
        &self,
        match_request_id: &str,
        matches: &[RankedMatch],
    ) -> Result<Vec<ProposalRecord>, ProposalError>;
}

#[derive(Debug, Default)]
pub struct InMemoryProposalSink {
    records: Mutex<Vec<ProposalRecord>>,
}

impl InMemoryProposalSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ProposalRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ProposalSink for InMemoryProposalSink {
    #[instrument(skip(self, matches), fields(count = matches.len()))]
    async fn record_proposals(
        &self,
        match_request_id: &str,
        matches: &[RankedMatch],
    ) -> Result<Vec<ProposalRecord>, ProposalError> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| ProposalError::Unavailable("proposal store lock poisoned".into()))?;

        let mut batch = HashSet::with_capacity(matches.len());
        for ranked in matches {
            let candidate_id = ranked.candidate.id.as_str();
            let duplicate = !batch.insert(candidate_id)
                || stored.iter().any(|record| {
                    record.match_request_id == match_request_id
                        && record.candidate_id == candidate_id
                });
            if duplicate {
                return Err(ProposalError::Duplicate {
                    match_request_id: match_request_id.to_string(),
                    candidate_id: ranked.candidate.id.clone(),
                });
            }
        }

        let created: Vec<ProposalRecord> = matches
            .iter()
            .enumerate()
            .map(|(index, ranked)| ProposalRecord::from_ranked(match_request_id, index + 1, ranked))
            .collect();
        stored.extend(created.iter().cloned());
        Ok(created)
    }
}
