pub mod complexity;
pub mod estimate;
pub mod explain;
pub mod location;
pub mod mode;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod weights;

pub use complexity::{ComplexityAssessment, ComplexityTier, classify};
pub use estimate::{CostRange, DurationRange, DurationUnit, Estimate, EstimateError, Estimator};
pub use mode::{ConfidencePolicy, Mode, ModeKind, ScoreScale};
pub use pipeline::{MatchingEngine, RankError, RankedMatch, Ranking};
pub use ranking::ScoreBreakdown;
pub use weights::{Criterion, WeightError, WeightTable};

/// Stamped on every response and proposal record.
pub const ENGINE_VERSION: &str = concat!("lexmatch-", env!("CARGO_PKG_VERSION"));
