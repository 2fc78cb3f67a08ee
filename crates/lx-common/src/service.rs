use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{
    api::{MatchRequest, MatchResponse},
    directory::{CandidateDirectory, DirectoryError},
    matching::{MatchingEngine, RankError},
    proposals::{ProposalError, ProposalSink},
    run_id,
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("candidate directory failed: {0}")]
    Directory(#[from] DirectoryError),
    #[error("ranking failed: {0}")]
    Rank(#[from] RankError),
    #[error("failed to record proposals: {0}")]
    Proposals(#[from] ProposalError),
}

/// Fetch → rank → persist around one [`MatchingEngine`].
pub struct MatchService<D, S> {
    engine: MatchingEngine,
    directory: D,
    sink: S,
}

impl<D, S> MatchService<D, S>
where
    D: CandidateDirectory,
    S: ProposalSink,
{
    pub fn new(engine: MatchingEngine, directory: D, sink: S) -> Self {
        Self {
            engine,
            directory,
            sink,
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn run(&self, request: &MatchRequest) -> Result<MatchResponse, ServiceError> {
        self.run_with_cancel(request, &CancellationToken::new()).await
    }

    #[instrument(skip_all, fields(mode = request.mode.as_ref(), practice_area = %request.criteria.practice_area_id))]
    pub async fn run_with_cancel(
        &self,
        request: &MatchRequest,
        cancel: &CancellationToken,
    ) -> Result<MatchResponse, ServiceError> {
        let match_request_id = request
            .match_request_id
            .clone()
            .unwrap_or_else(run_id::generate);

        let pool = self
            .directory
            .fetch_eligible_candidates(&request.criteria.practice_area_id, &request.filters)
            .await?;

        let ranking = self.engine.rank_with_cancel(
            &request.criteria,
            &pool,
            request.mode,
            request.limit,
            cancel,
        )?;

        let proposals = match self.sink.record_proposals(&match_request_id, &ranking.matches).await {
            Ok(proposals) => proposals,
            Err(err) => {
                warn!(%match_request_id, error = %err, "proposal persistence failed");
                return Err(err.into());
            }
        };

        info!(
            %match_request_id,
            returned = ranking.matches.len(),
            proposals = proposals.len(),
            "match request completed"
        );

        Ok(MatchResponse::from_ranking(
            match_request_id,
            ranking,
            &proposals,
            Utc::now(),
        ))
    }
}
