//! Date-range selection and exports

use crate::metric::ContentMetric;
use crate::AnalyticsError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Record carrying a point in time
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for ContentMetric {
    fn timestamp(&self) -> DateTime<Utc> {
        self.release_date
    }
}

/// Inclusive time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl DateRange {
    /// Create a range. A reversed range is allowed and matches nothing.
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Range covering `duration` up to and including `end`
    pub fn trailing(end: DateTime<Utc>, duration: Duration) -> Self {
        let start = end
            .checked_sub_signed(duration)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::new(start, end)
    }

    /// Whether start <= end
    pub fn is_valid(&self) -> bool {
        self.start_date <= self.end_date
    }

    /// Inclusive on both bounds
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start_date && timestamp <= self.end_date
    }
}

/// Filtered records plus export metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeExport<T> {
    pub records: Vec<T>,
    pub original_count: usize,
    pub filtered_count: usize,
    pub date_range: DateRange,
    pub exported_at: DateTime<Utc>,
}

impl<T: Serialize> RangeExport<T> {
    /// Pretty-printed JSON document
    pub fn to_json(&self) -> Result<String, AnalyticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Records whose timestamp falls inside the range
pub fn filter_by_range<T>(records: &[T], range: &DateRange) -> Vec<T>
where
    T: Timestamped + Clone,
{
    if !range.is_valid() {
        debug!(
            "Reversed range {} > {}, nothing selected",
            range.start_date, range.end_date
        );
    }

    records
        .iter()
        .filter(|r| range.contains(r.timestamp()))
        .cloned()
        .collect()
}

/// Filter records and wrap them with export metadata
pub fn export_with_range<T>(records: &[T], range: &DateRange) -> RangeExport<T>
where
    T: Timestamped + Clone,
{
    let filtered = filter_by_range(records, range);
    info!(
        "Exporting {} of {} records ({} to {})",
        filtered.len(),
        records.len(),
        range.start_date,
        range.end_date
    );

    RangeExport {
        original_count: records.len(),
        filtered_count: filtered.len(),
        records: filtered,
        date_range: *range,
        exported_at: Utc::now(),
    }
}
