//! Content performance records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
}

/// Aggregated performance of a single title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetric {
    pub content_id: String,
    pub title: String,
    pub content_type: ContentType,
    /// Total watch time in minutes
    pub watch_time: f64,
    /// Average completion (0-100)
    pub completion_rate: f64,
    pub total_views: u64,
    pub unique_viewers: u64,
    /// Average rating (0-10)
    pub average_rating: f64,
    pub release_date: DateTime<Utc>,
}
