use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    matching::{ComplexityAssessment, ENGINE_VERSION, ModeKind, RankedMatch, Ranking},
    proposals::ProposalRecord,
    run_id,
};

/// Ranked shortlist returned to the caller of a match request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub match_request_id: String,
    /// Process run that produced the ranking.
    pub match_run_id: String,
    pub mode: ModeKind,
    pub engine_version: String,
    pub complexity: ComplexityAssessment,
    /// Eligible candidates considered before the floor and cap.
    pub pool_size: usize,
    pub match_count: usize,
    pub matches: Vec<ProposedMatch>,
    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedMatch {
    /// 1-based.
    pub rank: usize,
    /// Set once the match has been persisted as a proposal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    #[serde(flatten)]
    pub ranked: RankedMatch,
}

impl MatchResponse {
    /// Pairs ranked matches with stored proposals by rank; unmatched entries
    /// keep `proposal_id: None`.
    pub fn from_ranking(
        match_request_id: impl Into<String>,
        ranking: Ranking,
        proposals: &[ProposalRecord],
        matched_at: DateTime<Utc>,
    ) -> Self {
        let matches: Vec<ProposedMatch> = ranking
            .matches
            .into_iter()
            .enumerate()
            .map(|(index, ranked)| {
                let rank = index + 1;
                ProposedMatch {
                    rank,
                    proposal_id: proposals
                        .iter()
                        .find(|record| record.rank == rank)
                        .map(|record| record.proposal_id.clone()),
                    ranked,
                }
            })
            .collect();

        Self {
            match_request_id: match_request_id.into(),
            match_run_id: run_id::get().to_string(),
            mode: ranking.mode,
            engine_version: ENGINE_VERSION.to_string(),
            complexity: ranking.assessment,
            pool_size: ranking.pool_size,
            match_count: matches.len(),
            matches,
            matched_at,
        }
    }
}
