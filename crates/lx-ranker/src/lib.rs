use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use lx_common::{
    CaseCriteria, CriteriaError,
    api::{MatchRequest, MatchResponse},
    config::{ConfigError, EngineConfig},
    directory::{DirectoryError, InMemoryDirectory},
    matching::{MatchingEngine, ModeKind, RankedMatch, WeightTable},
    proposals::{InMemoryProposalSink, ProposalError, ProposalRecord, ProposalSink},
    service::{MatchService, ServiceError},
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "lx-ranker",
    about = "Rank legal practitioners for a case from JSON snapshots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank a candidate snapshot for one case request and print the response JSON
    Rank(RankArgs),
    /// Print the complexity assessment for a case description
    Classify {
        /// Free-text case description
        text: String,
    },
    /// Print the active weight tables (after LX_WEIGHTS_PATH overrides)
    Weights {
        #[arg(long)]
        mode: Option<ModeKind>,
    },
}

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Case request: a match request object or bare case criteria
    #[arg(long, env = "LX_REQUEST_PATH")]
    pub request: PathBuf,

    /// JSON array of candidate profiles
    #[arg(long, env = "LX_CANDIDATES_PATH")]
    pub candidates: PathBuf,

    /// Overrides the mode given in the request file
    #[arg(long)]
    pub mode: Option<ModeKind>,

    /// Lowers the mode's result cap
    #[arg(long)]
    pub limit: Option<usize>,

    /// Record proposals for the ranked matches and include their ids
    #[arg(long, default_value_t = false)]
    pub persist: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid case request: {0}")]
    Criteria(#[from] CriteriaError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Request files may hold a full match request or only the case criteria.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RequestFile {
    Request(MatchRequest),
    Criteria(CaseCriteria),
}

pub fn load_request(path: &Path) -> Result<MatchRequest, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: RequestFile = serde_json::from_str(&raw).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match parsed {
        RequestFile::Request(request) => request,
        RequestFile::Criteria(criteria) => MatchRequest::new(criteria, ModeKind::default()),
    })
}

/// Sink used when `--persist` is off: nothing is stored, no ids are issued.
#[derive(Debug, Default)]
pub struct DiscardProposals;

impl ProposalSink for DiscardProposals {
    async fn record_proposals(
        &self,
        _match_request_id: &str,
        _matches: &[RankedMatch],
    ) -> Result<Vec<ProposalRecord>, ProposalError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Serialize)]
struct WeightsOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    standard: Option<&'a WeightTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extended: Option<&'a WeightTable>,
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<(), CliError> {
    let config = EngineConfig::load()?;
    run_with_config(cli, config, out).await
}

pub async fn run_with_config<W: Write>(
    cli: Cli,
    config: EngineConfig,
    out: &mut W,
) -> Result<(), CliError> {
    match cli.command {
        Command::Classify { text } => {
            write_json(out, &lx_common::matching::classify(&text))?;
        }
        Command::Weights { mode } => {
            let output = WeightsOutput {
                standard: (mode != Some(ModeKind::Extended)).then_some(&config.standard.weights),
                extended: (mode != Some(ModeKind::Standard)).then_some(&config.extended.weights),
            };
            write_json(out, &output)?;
        }
        Command::Rank(args) => {
            let response = rank(args, config).await?;
            write_json(out, &response)?;
        }
    }
    Ok(())
}

async fn rank(args: RankArgs, config: EngineConfig) -> Result<MatchResponse, CliError> {
    let mut request = load_request(&args.request)?;
    if let Some(mode) = args.mode {
        request.mode = mode;
    }
    if args.limit.is_some() {
        request.limit = args.limit;
    }
    request.criteria.validate()?;

    let directory = InMemoryDirectory::from_json_file(&args.candidates)?;
    let engine = MatchingEngine::new(config)?;
    let started = Instant::now();

    let response = if args.persist {
        MatchService::new(engine, directory, InMemoryProposalSink::new())
            .run(&request)
            .await?
    } else {
        MatchService::new(engine, directory, DiscardProposals)
            .run(&request)
            .await?
    };

    lx_metrics::record_ranking(
        request.mode.as_ref(),
        response.pool_size,
        response.match_count,
        started.elapsed(),
    );
    info!(
        match_request_id = %response.match_request_id,
        returned = response.match_count,
        persisted = args.persist,
        "rank command finished"
    );
    Ok(response)
}
