//! Content ranking strategies
//!
//! Every ranking returns a new collection and leaves the input untouched.
//! Sorts are stable, so equal keys keep their source order.

use crate::metric::ContentMetric;
use crate::AnalyticsError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::debug;

/// Weights for the composite score
///
/// The ranker does not require the weights to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    /// Weight of normalized watch time
    pub watch_time: f64,
    /// Weight of completion rate over 100
    pub completion_rate: f64,
    /// Weight of normalized total views
    pub total_views: f64,
    /// Weight of normalized unique viewers
    pub unique_viewers: f64,
    /// Weight of average rating over 10
    pub average_rating: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            watch_time: 0.30,
            completion_rate: 0.25,
            total_views: 0.20,
            unique_viewers: 0.15,
            average_rating: 0.10,
        }
    }
}

impl RankingWeights {
    /// Parse weights from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, AnalyticsError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load weights from a file, with `ADMIN_RANKING__*` environment overrides
    pub fn load(path: &str) -> Result<Self, AnalyticsError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("ADMIN_RANKING").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Ranking strategy
#[derive(Debug, Clone, PartialEq)]
pub enum RankingMethod {
    WatchTime,
    CompletionRate,
    TotalViews,
    UniqueViewers,
    Composite(RankingWeights),
}

impl FromStr for RankingMethod {
    type Err = AnalyticsError;

    /// `composite` uses the default weights
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watch_time" | "watchTime" => Ok(RankingMethod::WatchTime),
            "completion_rate" | "completionRate" => Ok(RankingMethod::CompletionRate),
            "total_views" | "totalViews" => Ok(RankingMethod::TotalViews),
            "unique_viewers" | "uniqueViewers" => Ok(RankingMethod::UniqueViewers),
            "composite" => Ok(RankingMethod::Composite(RankingWeights::default())),
            other => Err(AnalyticsError::UnknownMethod(other.to_string())),
        }
    }
}

/// Content paired with its composite score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredContent {
    #[serde(flatten)]
    pub content: ContentMetric,
    pub composite_score: f64,
}

/// Entry of a top-N listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedContent {
    /// 1-based position
    pub rank: usize,
    #[serde(flatten)]
    pub content: ContentMetric,
    /// Present for composite rankings
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub composite_score: Option<f64>,
}

fn sorted_desc<F>(content: &[ContentMetric], compare: F) -> Vec<ContentMetric>
where
    F: Fn(&ContentMetric, &ContentMetric) -> Ordering,
{
    let mut sorted = content.to_vec();
    sorted.sort_by(|a, b| compare(b, a));
    sorted
}

/// Highest watch time first
pub fn sort_by_watch_time(content: &[ContentMetric]) -> Vec<ContentMetric> {
    sorted_desc(content, |a, b| a.watch_time.total_cmp(&b.watch_time))
}

/// Highest completion rate first
pub fn sort_by_completion_rate(content: &[ContentMetric]) -> Vec<ContentMetric> {
    sorted_desc(content, |a, b| a.completion_rate.total_cmp(&b.completion_rate))
}

/// Most views first
pub fn sort_by_total_views(content: &[ContentMetric]) -> Vec<ContentMetric> {
    sorted_desc(content, |a, b| a.total_views.cmp(&b.total_views))
}

/// Most unique viewers first
pub fn sort_by_unique_viewers(content: &[ContentMetric]) -> Vec<ContentMetric> {
    sorted_desc(content, |a, b| a.unique_viewers.cmp(&b.unique_viewers))
}

/// Value divided by the batch maximum, 0 when the maximum is not positive
fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

/// Rank by weighted composite score, highest first
///
/// Watch time, views and unique viewers are normalized by the batch maximum;
/// completion rate by 100 and rating by 10.
pub fn rank_composite(content: &[ContentMetric], weights: &RankingWeights) -> Vec<ScoredContent> {
    let max_watch_time = content.iter().map(|c| c.watch_time).fold(0.0, f64::max);
    let max_views = content.iter().map(|c| c.total_views).max().unwrap_or(0) as f64;
    let max_viewers = content.iter().map(|c| c.unique_viewers).max().unwrap_or(0) as f64;

    let mut scored: Vec<ScoredContent> = content
        .iter()
        .map(|c| {
            let composite_score = weights.watch_time * ratio(c.watch_time, max_watch_time)
                + weights.completion_rate * (c.completion_rate / 100.0)
                + weights.total_views * ratio(c.total_views as f64, max_views)
                + weights.unique_viewers * ratio(c.unique_viewers as f64, max_viewers)
                + weights.average_rating * (c.average_rating / 10.0);
            ScoredContent {
                content: c.clone(),
                composite_score,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    scored
}

/// First `n` entries of the chosen ranking
pub fn top_n(content: &[ContentMetric], n: usize, method: &RankingMethod) -> Vec<RankedContent> {
    if n == 0 || content.is_empty() {
        return Vec::new();
    }

    let ranked: Vec<(ContentMetric, Option<f64>)> = match method {
        RankingMethod::WatchTime => plain(sort_by_watch_time(content)),
        RankingMethod::CompletionRate => plain(sort_by_completion_rate(content)),
        RankingMethod::TotalViews => plain(sort_by_total_views(content)),
        RankingMethod::UniqueViewers => plain(sort_by_unique_viewers(content)),
        RankingMethod::Composite(weights) => rank_composite(content, weights)
            .into_iter()
            .map(|s| (s.content, Some(s.composite_score)))
            .collect(),
    };

    debug!("Top {} of {} by {:?}", n.min(content.len()), content.len(), method);

    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (content, composite_score))| RankedContent {
            rank: i + 1,
            content,
            composite_score,
        })
        .collect()
}

fn plain(sorted: Vec<ContentMetric>) -> Vec<(ContentMetric, Option<f64>)> {
    sorted.into_iter().map(|c| (c, None)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::ContentType;
    use chrono::{TimeZone, Utc};

    fn content(
        id: &str,
        watch: f64,
        completion: f64,
        views: u64,
        viewers: u64,
        rating: f64,
    ) -> ContentMetric {
        ContentMetric {
            content_id: id.to_string(),
            title: format!("Title {}", id),
            content_type: ContentType::Movie,
            watch_time: watch,
            completion_rate: completion,
            total_views: views,
            unique_viewers: viewers,
            average_rating: rating,
            release_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    fn catalog() -> Vec<ContentMetric> {
        vec![
            content("a", 1200.0, 65.0, 300, 250, 7.1),
            content("b", 5400.0, 40.0, 900, 400, 6.0),
            content("c", 800.0, 92.0, 150, 140, 8.9),
            content("d", 5400.0, 75.0, 600, 600, 7.5),
        ]
    }

    fn ids(content: &[ContentMetric]) -> Vec<&str> {
        content.iter().map(|c| c.content_id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_watch_time_is_stable() {
        let sorted = sort_by_watch_time(&catalog());
        assert_eq!(ids(&sorted), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_field_sorts() {
        let catalog = catalog();
        assert_eq!(ids(&sort_by_completion_rate(&catalog)), vec!["c", "d", "a", "b"]);
        assert_eq!(ids(&sort_by_total_views(&catalog)), vec!["b", "d", "a", "c"]);
        assert_eq!(ids(&sort_by_unique_viewers(&catalog)), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_input_not_mutated() {
        let catalog = catalog();
        let before = catalog.clone();
        let _ = sort_by_total_views(&catalog);
        let _ = rank_composite(&catalog, &RankingWeights::default());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_composite_scores() {
        let ranked = rank_composite(&catalog(), &RankingWeights::default());

        // d: 0.30*1 + 0.25*0.75 + 0.20*(600/900) + 0.15*1 + 0.10*0.75
        let d = ranked.iter().find(|s| s.content.content_id == "d").unwrap();
        let expected = 0.30 + 0.1875 + 0.20 * (600.0 / 900.0) + 0.15 + 0.075;
        assert!((d.composite_score - expected).abs() < 1e-9);
        assert_eq!(ranked[0].content.content_id, "d");
        assert_eq!(d.content, catalog()[3]);
    }

    #[test]
    fn test_composite_all_zero_batch() {
        let zeros = vec![content("x", 0.0, 0.0, 0, 0, 0.0), content("y", 0.0, 0.0, 0, 0, 0.0)];
        let ranked = rank_composite(&zeros, &RankingWeights::default());

        assert!(ranked.iter().all(|s| s.composite_score == 0.0));
        assert_eq!(ranked[0].content.content_id, "x");
    }

    #[test]
    fn test_custom_weights() {
        let weights = RankingWeights {
            watch_time: 0.0,
            completion_rate: 1.0,
            total_views: 0.0,
            unique_viewers: 0.0,
            average_rating: 0.0,
        };
        let ranked = rank_composite(&catalog(), &weights);
        assert_eq!(ranked[0].content.content_id, "c");
        assert!((ranked[0].composite_score - 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_top_n() {
        let top = top_n(&catalog(), 2, &RankingMethod::TotalViews);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].content.content_id, "b");
        assert_eq!(top[1].rank, 2);
        assert!(top[0].composite_score.is_none());

        let composite = top_n(&catalog(), 1, &RankingMethod::Composite(RankingWeights::default()));
        assert!(composite[0].composite_score.is_some());
    }

    #[test]
    fn test_top_n_edges() {
        assert!(top_n(&catalog(), 0, &RankingMethod::WatchTime).is_empty());
        assert!(top_n(&[], 5, &RankingMethod::WatchTime).is_empty());
        assert_eq!(top_n(&catalog(), 50, &RankingMethod::WatchTime).len(), 4);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("watchTime".parse::<RankingMethod>().unwrap(), RankingMethod::WatchTime);
        assert_eq!(
            "composite".parse::<RankingMethod>().unwrap(),
            RankingMethod::Composite(RankingWeights::default())
        );
        assert!(matches!(
            "popularity".parse::<RankingMethod>(),
            Err(AnalyticsError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_weights_from_toml() {
        let toml = r#"
            watch_time = 0.5
            completion_rate = 0.2
            total_views = 0.1
            unique_viewers = 0.1
            average_rating = 0.1
        "#;
        let weights = RankingWeights::from_toml_str(toml).unwrap();
        assert_eq!(weights.watch_time, 0.5);
        assert_eq!(weights.average_rating, 0.1);
    }

    #[test]
    fn test_load_applies_env_override() {
        let path =
            std::env::temp_dir().join(format!("admin-ranking-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
            watch_time = 0.3
            completion_rate = 0.25
            total_views = 0.2
            unique_viewers = 0.15
            average_rating = 0.1
            "#,
        )
        .unwrap();
        std::env::set_var("ADMIN_RANKING__WATCH_TIME", "0.5");

        let loaded = RankingWeights::load(path.to_str().unwrap());
        std::env::remove_var("ADMIN_RANKING__WATCH_TIME");
        std::fs::remove_file(&path).unwrap();

        let weights = loaded.unwrap();
        assert_eq!(weights.watch_time, 0.5);
        assert_eq!(weights.completion_rate, 0.25);
    }
}
