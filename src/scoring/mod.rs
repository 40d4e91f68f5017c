pub mod engine;
pub mod tier;
pub mod weights;

pub use engine::{
    explain, logistic, missing_features, score, score_period, FeatureContribution, Prediction,
    ScoreBreakdown, StatsInput,
};
pub use tier::{interpret, Tier, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
pub use weights::{Period, WeightTable, SHARED_FEATURES};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("period must be 1, 2 or 3 (got {0:?})")]
    InvalidPeriod(String),
}
