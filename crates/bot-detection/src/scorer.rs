//! Weighted bot confidence scoring

use crate::criteria::DetectionCriteria;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page-viewing behavior observed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewingPattern {
    #[default]
    Normal,
    Unusual,
}

/// Activity sample for a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    /// Identifier carried through to the result
    pub user_id: String,
    /// Requests per minute
    pub requests_per_minute: f64,
    /// Raw `User-Agent` header
    pub user_agent: String,
    /// Whether the client executed JavaScript
    #[serde(rename = "hasJavaScript")]
    pub has_javascript: bool,
    /// Pages per second
    pub navigation_speed: f64,
    /// Viewing behavior classification
    pub viewing_patterns: ViewingPattern,
    /// Request came from a hosting provider range
    #[serde(rename = "isDatacenterIP")]
    pub is_datacenter_ip: bool,
    /// Request came through a VPN or proxy
    #[serde(rename = "isVPN")]
    pub is_vpn: bool,
    /// Location inconsistent with the session
    pub has_geographic_anomalies: bool,
}

impl Default for UserActivity {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            requests_per_minute: 0.0,
            user_agent: String::new(),
            has_javascript: true,
            navigation_speed: 0.0,
            viewing_patterns: ViewingPattern::Normal,
            is_datacenter_ip: false,
            is_vpn: false,
            has_geographic_anomalies: false,
        }
    }
}

/// Classification derived from the confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStatus {
    ConfirmedHuman,
    PendingReview,
    Suspected,
    ConfirmedBot,
}

impl BotStatus {
    /// Map a confidence score onto its band
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            BotStatus::ConfirmedBot
        } else if score >= 50.0 {
            BotStatus::Suspected
        } else if score >= 30.0 {
            BotStatus::PendingReview
        } else {
            BotStatus::ConfirmedHuman
        }
    }
}

/// Scored activity sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotDetectionResult {
    /// Identifier of the scored activity
    pub user_id: String,
    /// Confidence in [0, 100]
    pub confidence_score: f64,
    /// One entry per contributing signal, in evaluation order
    pub detection_reasons: Vec<String>,
    /// Band derived from `confidence_score`
    pub status: BotStatus,
}

/// Running total of contributing signals
#[derive(Default)]
struct Evidence {
    score: f64,
    reasons: Vec<String>,
}

impl Evidence {
    /// Non-positive and NaN weights contribute nothing
    fn add(&mut self, weight: f64, reason: impl FnOnce() -> String) {
        if weight > 0.0 {
            self.score += weight;
            self.reasons.push(reason());
        }
    }
}

/// Heuristic bot scorer
pub struct BotScorer {
    criteria: DetectionCriteria,
}

impl BotScorer {
    /// Create a scorer with the given criteria
    pub fn new(criteria: DetectionCriteria) -> Self {
        Self { criteria }
    }

    /// Criteria in use
    pub fn criteria(&self) -> &DetectionCriteria {
        &self.criteria
    }

    /// Score a single activity sample
    pub fn score(&self, activity: &UserActivity) -> BotDetectionResult {
        let criteria = &self.criteria;
        let mut evidence = Evidence::default();

        let frequency = &criteria.request_frequency;
        if activity.requests_per_minute > frequency.threshold {
            evidence.add(frequency.weight, || {
                format!(
                    "High request frequency: {} requests/minute",
                    activity.requests_per_minute
                )
            });
        }

        let user_agent = &criteria.user_agent_patterns;
        if user_agent.matches(&activity.user_agent) {
            evidence.add(user_agent.weight, || {
                "Suspicious user agent pattern detected".to_string()
            });
        }

        let behavioral = &criteria.behavioral;
        if !activity.has_javascript {
            evidence.add(behavioral.no_javascript.weight, || {
                "JavaScript disabled".to_string()
            });
        }
        if activity.navigation_speed > behavioral.rapid_navigation.threshold {
            evidence.add(behavioral.rapid_navigation.weight, || {
                format!(
                    "Rapid navigation: {} pages/second",
                    activity.navigation_speed
                )
            });
        }
        if activity.viewing_patterns == ViewingPattern::Unusual {
            evidence.add(behavioral.unusual_viewing_patterns.weight, || {
                "Unusual viewing patterns".to_string()
            });
        }

        let ip = &criteria.ip_analysis;
        if activity.is_datacenter_ip {
            evidence.add(ip.datacenter_ip.weight, || "Datacenter IP address".to_string());
        }
        if activity.is_vpn {
            evidence.add(ip.vpn_detection.weight, || "VPN or proxy detected".to_string());
        }
        if activity.has_geographic_anomalies {
            evidence.add(ip.geographic_anomalies.weight, || {
                "Geographic anomalies detected".to_string()
            });
        }

        let confidence_score = evidence.score.clamp(0.0, 100.0);
        let status = BotStatus::from_score(confidence_score);

        debug!(
            "Scored {}: {} ({:?}, {} signals)",
            activity.user_id,
            confidence_score,
            status,
            evidence.reasons.len()
        );

        BotDetectionResult {
            user_id: activity.user_id.clone(),
            confidence_score,
            detection_reasons: evidence.reasons,
            status,
        }
    }

    /// Score a batch, preserving input order
    pub fn score_all(&self, activities: &[UserActivity]) -> Vec<BotDetectionResult> {
        activities.iter().map(|a| self.score(a)).collect()
    }
}

impl Default for BotScorer {
    fn default() -> Self {
        Self::new(DetectionCriteria::default())
    }
}
