//! Confidence-based partitioning of detection results

use crate::scorer::{BotDetectionResult, BotStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Filter options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Pass every result through untouched
    pub include_bots: bool,
    /// Results scoring at or above this are excluded
    pub confidence_threshold: f64,
    /// Attach summary metrics to the partition
    pub show_bot_metrics: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            include_bots: false,
            confidence_threshold: 80.0,
            show_bot_metrics: false,
        }
    }
}

/// Result counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    /// Results scored below 30
    pub confirmed_human: usize,
    /// Results scored in [30, 50)
    pub pending_review: usize,
    /// Results scored in [50, 80)
    pub suspected: usize,
    /// Results scored 80 or above
    pub confirmed_bot: usize,
}

/// Summary of a partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMetrics {
    /// Number of results partitioned
    pub total: usize,
    /// Size of the included set
    pub included: usize,
    /// Size of the excluded set
    pub excluded: usize,
    /// Mean confidence over all results (0 when empty)
    pub average_confidence: f64,
    /// Counts over all results, included or not
    pub by_status: StatusCounts,
}

/// Partitioned results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredResults {
    /// Results kept, in input order
    pub included: Vec<BotDetectionResult>,
    /// Results dropped by the confidence threshold, in input order
    pub excluded: Vec<BotDetectionResult>,
    /// Present when `show_bot_metrics` is set
    pub metrics: Option<BotMetrics>,
}

/// Split results into included and excluded sets
///
/// Total and disjoint; input order is kept on both sides.
pub fn partition(results: &[BotDetectionResult], options: &FilterOptions) -> FilteredResults {
    let (included, excluded): (Vec<_>, Vec<_>) = if options.include_bots {
        (results.to_vec(), Vec::new())
    } else {
        results
            .iter()
            .cloned()
            .partition(|r| !is_excluded(r, options.confidence_threshold))
    };

    debug!(
        "Partitioned {} results: {} included, {} excluded",
        results.len(),
        included.len(),
        excluded.len()
    );

    let metrics = options
        .show_bot_metrics
        .then(|| summarize(results, included.len(), excluded.len()));

    FilteredResults {
        included,
        excluded,
        metrics,
    }
}

/// A NaN threshold excludes nothing
fn is_excluded(result: &BotDetectionResult, threshold: f64) -> bool {
    result.confidence_score >= threshold
}

fn summarize(results: &[BotDetectionResult], included: usize, excluded: usize) -> BotMetrics {
    let mut by_status = StatusCounts::default();
    for result in results {
        match result.status {
            BotStatus::ConfirmedHuman => by_status.confirmed_human += 1,
            BotStatus::PendingReview => by_status.pending_review += 1,
            BotStatus::Suspected => by_status.suspected += 1,
            BotStatus::ConfirmedBot => by_status.confirmed_bot += 1,
        }
    }

    let average_confidence = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.confidence_score).sum::<f64>() / results.len() as f64
    };

    BotMetrics {
        total: results.len(),
        included,
        excluded,
        average_confidence,
        by_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(user_id: &str, score: f64) -> BotDetectionResult {
        BotDetectionResult {
            user_id: user_id.to_string(),
            confidence_score: score,
            detection_reasons: Vec::new(),
            status: BotStatus::from_score(score),
        }
    }

    fn sample() -> Vec<BotDetectionResult> {
        vec![
            result("a", 10.0),
            result("b", 85.0),
            result("c", 70.0),
            result("d", 40.0),
        ]
    }

    #[test]
    fn test_threshold_partition() {
        let options = FilterOptions {
            confidence_threshold: 70.0,
            ..Default::default()
        };
        let filtered = partition(&sample(), &options);

        let ids = |rs: &[BotDetectionResult]| {
            rs.iter().map(|r| r.user_id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&filtered.included), vec!["a", "d"]);
        assert_eq!(ids(&filtered.excluded), vec!["b", "c"]);
        assert!(filtered.metrics.is_none());
    }

    #[test]
    fn test_include_bots_passes_through() {
        let options = FilterOptions {
            include_bots: true,
            confidence_threshold: 0.0,
            ..Default::default()
        };
        let filtered = partition(&sample(), &options);

        assert_eq!(filtered.included, sample());
        assert!(filtered.excluded.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let filtered = partition(&[], &FilterOptions::default());
        assert!(filtered.included.is_empty());
        assert!(filtered.excluded.is_empty());
    }

    #[test]
    fn test_metrics_summary() {
        let options = FilterOptions {
            show_bot_metrics: true,
            ..Default::default()
        };
        let filtered = partition(&sample(), &options);
        let metrics = filtered.metrics.unwrap();

        assert_eq!(metrics.total, 4);
        assert_eq!(metrics.included, 3);
        assert_eq!(metrics.excluded, 1);
        assert!((metrics.average_confidence - 51.25).abs() < 1e-9);
        assert_eq!(
            metrics.by_status,
            StatusCounts {
                confirmed_human: 1,
                pending_review: 1,
                suspected: 1,
                confirmed_bot: 1,
            }
        );
    }

    #[test]
    fn test_metrics_for_empty_input() {
        let options = FilterOptions {
            show_bot_metrics: true,
            ..Default::default()
        };
        let metrics = partition(&[], &options).metrics.unwrap();
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.average_confidence, 0.0);
    }
}
