//! Bot Detection
//!
//! Scores user activity samples against weighted heuristics, classifies them,
//! and partitions scored results by confidence for reporting.

mod criteria;
mod error;
mod filter;
mod scorer;

pub use criteria::{
    BehavioralCriteria, DetectionCriteria, IpCriteria, ThresholdSignal, UserAgentCriterion,
    WeightedSignal,
};
pub use error::DetectionError;
pub use filter::{partition, BotMetrics, FilterOptions, FilteredResults, StatusCounts};
pub use scorer::{BotDetectionResult, BotScorer, BotStatus, UserActivity, ViewingPattern};
