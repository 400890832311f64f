//! Content Analytics
//!
//! Ranks content performance metrics and selects records by date range for
//! reporting exports.

mod error;
mod metric;
mod range;
mod ranker;

pub use error::AnalyticsError;
pub use metric::{ContentMetric, ContentType};
pub use range::{export_with_range, filter_by_range, DateRange, RangeExport, Timestamped};
pub use ranker::{
    rank_composite, sort_by_completion_rate, sort_by_total_views, sort_by_unique_viewers,
    sort_by_watch_time, top_n, RankedContent, RankingMethod, RankingWeights, ScoredContent,
};
