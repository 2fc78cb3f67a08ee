use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::matching::{
    estimate::DEFAULT_CURRENCY,
    mode::{Mode, ModeKind},
    weights::{WeightError, WeightTable},
};

pub const ENV_MATCH_WORKERS: &str = "LX_MATCH_WORKERS";
pub const ENV_PARALLEL_THRESHOLD: &str = "LX_PARALLEL_THRESHOLD";
pub const ENV_HOME_REGION: &str = "LX_HOME_REGION";
pub const ENV_CURRENCY: &str = "LX_CURRENCY";
pub const ENV_WEIGHTS_PATH: &str = "LX_WEIGHTS_PATH";

pub const DEFAULT_PARALLEL_THRESHOLD: usize = 32;
pub const DEFAULT_HOME_REGION: &str = "QC";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer (got {value:?})")]
    InvalidNumber { key: &'static str, value: String },
    #[error("LX_MATCH_WORKERS must be at least 1")]
    ZeroWorkers,
    #[error("failed to read weight overrides from {path}: {source}")]
    ReadWeights {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse weight overrides from {path}: {source}")]
    ParseWeights {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {mode:?} weight table: {source}")]
    InvalidWeights {
        mode: ModeKind,
        #[source]
        source: WeightError,
    },
    #[error("failed to build scoring thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Optional per-mode weight tables loaded from `LX_WEIGHTS_PATH`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightOverrides {
    #[serde(default)]
    pub standard: Option<WeightTable>,
    #[serde(default)]
    pub extended: Option<WeightTable>,
}

impl WeightOverrides {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadWeights {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseWeights {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Size of the engine-owned scoring pool.
    pub workers: usize,
    /// Pools with fewer candidates are scored on the calling thread.
    pub parallel_threshold: usize,
    /// Region assumed for clients who typed only a city.
    pub home_region: String,
    pub currency: String,
    pub standard: Mode,
    pub extended: Mode,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|workers| workers.get())
        .unwrap_or(1)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            home_region: DEFAULT_HOME_REGION.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            standard: Mode::standard(),
            extended: Mode::extended(),
        }
    }
}

fn parse_usize(key: &'static str, value: Option<String>) -> Result<Option<usize>, ConfigError> {
    let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}

impl EngineConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset keys keep their
    /// defaults; malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workers) = parse_usize(ENV_MATCH_WORKERS, lookup(ENV_MATCH_WORKERS))? {
            config.workers = workers;
        }
        if let Some(threshold) = parse_usize(ENV_PARALLEL_THRESHOLD, lookup(ENV_PARALLEL_THRESHOLD))? {
            config.parallel_threshold = threshold;
        }
        if let Some(region) = lookup(ENV_HOME_REGION).filter(|value| !value.trim().is_empty()) {
            config.home_region = region.trim().to_string();
        }
        if let Some(currency) = lookup(ENV_CURRENCY).filter(|value| !value.trim().is_empty()) {
            config.currency = currency.trim().to_uppercase();
        }
        if let Some(path) = lookup(ENV_WEIGHTS_PATH).filter(|value| !value.trim().is_empty()) {
            let overrides = WeightOverrides::from_json_file(Path::new(path.trim()))?;
            config = config.with_overrides(overrides);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: WeightOverrides) -> Self {
        if let Some(weights) = overrides.standard {
            self.standard = self.standard.with_weights(weights);
        }
        if let Some(weights) = overrides.extended {
            self.extended = self.extended.with_weights(weights);
        }
        self
    }

    pub fn mode(&self, kind: ModeKind) -> &Mode {
        match kind {
            ModeKind::Standard => &self.standard,
            ModeKind::Extended => &self.extended,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        for mode in [&self.standard, &self.extended] {
            mode.validate().map_err(|source| ConfigError::InvalidWeights {
                mode: mode.kind,
                source,
            })?;
        }
        Ok(())
    }
}
