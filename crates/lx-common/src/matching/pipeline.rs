use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::{
    complexity::{ComplexityAssessment, classify},
    estimate::{Estimate, Estimator},
    mode::ModeKind,
    ranking::{ScoreBreakdown, select_top},
    scoring::ScoringContext,
};
use crate::{CandidateProfile, CaseCriteria, config::ConfigError, config::EngineConfig, run_id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub candidate: CandidateProfile,
    pub breakdown: ScoreBreakdown,
    pub estimate: Estimate,
}

/// Output of one ranking run.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub mode: ModeKind,
    pub assessment: ComplexityAssessment,
    pub pool_size: usize,
    pub matches: Vec<RankedMatch>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    #[error("ranking was cancelled before completion")]
    Cancelled,
}

/// Stateless façade over classifier, scorers, ranker and estimator. The
/// scoring pool is built once and reused across calls.
pub struct MatchingEngine {
    config: EngineConfig,
    estimator: Estimator,
    workers: rayon::ThreadPool,
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("config", &self.config)
            .field("estimator", &self.estimator)
            .finish_non_exhaustive()
    }
}

impl MatchingEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("lx-score-{index}"))
            .build()?;

        Ok(Self {
            estimator: Estimator::new(config.currency.clone()),
            config,
            workers,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify(&self, description: &str) -> ComplexityAssessment {
        classify(description)
    }

    /// Ranks `pool` for `criteria` using the mode's own cap.
    pub fn rank(
        &self,
        criteria: &CaseCriteria,
        pool: &[CandidateProfile],
        mode: ModeKind,
    ) -> Vec<RankedMatch> {
        match self.rank_with_cancel(criteria, pool, mode, None, &CancellationToken::new()) {
            Ok(ranking) => ranking.matches,
            Err(RankError::Cancelled) => Vec::new(),
        }
    }

    /// `limit` can only lower the mode's cap. A cancelled run never yields a
    /// partial ranking.
    #[instrument(skip_all, fields(mode = mode.as_ref(), pool_size = pool.len()))]
    pub fn rank_with_cancel(
        &self,
        criteria: &CaseCriteria,
        pool: &[CandidateProfile],
        mode: ModeKind,
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<Ranking, RankError> {
        let started = Instant::now();
        if cancel.is_cancelled() {
            return Err(RankError::Cancelled);
        }

        let settings = self.config.mode(mode);
        let assessment = classify(&criteria.case_description);
        let ctx = ScoringContext {
            criteria,
            assessment: &assessment,
            mode,
            scale: settings.scale,
            home_region: &self.config.home_region,
        };

        let score_one = |(index, candidate): (usize, &CandidateProfile)| {
            if cancel.is_cancelled() {
                return None;
            }
            Some((index, ScoreBreakdown::evaluate(candidate, &ctx, settings)))
        };

        let scored: Option<Vec<(usize, ScoreBreakdown)>> = if self.runs_in_parallel(pool.len()) {
            self.workers
                .install(|| pool.par_iter().enumerate().map(score_one).collect())
        } else {
            pool.iter().enumerate().map(score_one).collect()
        };

        let scored = match scored {
            Some(scored) if !cancel.is_cancelled() => scored,
            _ => return Err(RankError::Cancelled),
        };

        let cap = limit.map_or(settings.max_results, |limit| limit.min(settings.max_results));
        let matches: Vec<RankedMatch> = select_top(scored, settings, cap, |(_, breakdown)| breakdown)
            .into_iter()
            .map(|(index, breakdown)| {
                let candidate = pool[index].clone();
                let estimate = self
                    .estimator
                    .estimate(&candidate, assessment.tier, criteria.urgency);
                RankedMatch {
                    candidate,
                    breakdown,
                    estimate,
                }
            })
            .collect();

        let elapsed = started.elapsed();
        info!(
            run_id = run_id::get(),
            mode = mode.as_ref(),
            tier = assessment.tier.as_ref(),
            pool_size = pool.len(),
            returned = matches.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "ranking complete"
        );

        Ok(Ranking {
            mode,
            assessment,
            pool_size: pool.len(),
            matches,
            elapsed,
        })
    }

    fn runs_in_parallel(&self, pool_size: usize) -> bool {
        self.config.workers > 1 && pool_size > 1 && pool_size >= self.config.parallel_threshold
    }
}
