//! Property tests for scoring and partitioning

use bot_detection::{
    partition, BotDetectionResult, BotScorer, BotStatus, DetectionCriteria, FilterOptions,
    UserActivity, ViewingPattern,
};
use proptest::prelude::*;

fn user_agent() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string()),
        Just("Googlebot/2.1".to_string()),
        Just("curl/8.4.0".to_string()),
        "[a-zA-Z/ .0-9]{0,40}",
    ]
}

fn activity() -> impl Strategy<Value = UserActivity> {
    (
        "[a-z0-9]{1,8}",
        0.0f64..500.0,
        user_agent(),
        any::<bool>(),
        0.0f64..20.0,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(user_id, rpm, ua, js, speed, unusual, datacenter, vpn, geo)| UserActivity {
                user_id,
                requests_per_minute: rpm,
                user_agent: ua,
                has_javascript: js,
                navigation_speed: speed,
                viewing_patterns: if unusual {
                    ViewingPattern::Unusual
                } else {
                    ViewingPattern::Normal
                },
                is_datacenter_ip: datacenter,
                is_vpn: vpn,
                has_geographic_anomalies: geo,
            },
        )
}

fn criteria() -> impl Strategy<Value = DetectionCriteria> {
    prop::collection::vec(-20.0f64..80.0, 8).prop_map(|w| {
        let mut criteria = DetectionCriteria::default();
        criteria.request_frequency.weight = w[0];
        criteria.user_agent_patterns.weight = w[1];
        criteria.behavioral.no_javascript.weight = w[2];
        criteria.behavioral.rapid_navigation.weight = w[3];
        criteria.behavioral.unusual_viewing_patterns.weight = w[4];
        criteria.ip_analysis.datacenter_ip.weight = w[5];
        criteria.ip_analysis.vpn_detection.weight = w[6];
        criteria.ip_analysis.geographic_anomalies.weight = w[7];
        criteria
    })
}

fn results() -> impl Strategy<Value = Vec<BotDetectionResult>> {
    prop::collection::vec(
        ("[a-z]{1,6}", 0.0f64..=100.0).prop_map(|(user_id, score)| BotDetectionResult {
            user_id,
            confidence_score: score,
            detection_reasons: Vec::new(),
            status: BotStatus::from_score(score),
        }),
        0..50,
    )
}

proptest! {
    #[test]
    fn score_within_bounds_and_banded(activity in activity(), criteria in criteria()) {
        let result = BotScorer::new(criteria).score(&activity);

        prop_assert!((0.0..=100.0).contains(&result.confidence_score));
        prop_assert_eq!(result.status, BotStatus::from_score(result.confidence_score));
        prop_assert_eq!(result.confidence_score > 0.0, !result.detection_reasons.is_empty());
    }

    #[test]
    fn scoring_is_deterministic(activity in activity()) {
        let scorer = BotScorer::default();
        prop_assert_eq!(scorer.score(&activity), scorer.score(&activity));
    }

    #[test]
    fn partition_is_total_and_disjoint(
        results in results(),
        threshold in 0.0f64..=100.0,
        include_bots in any::<bool>(),
    ) {
        let options = FilterOptions {
            include_bots,
            confidence_threshold: threshold,
            show_bot_metrics: false,
        };
        let filtered = partition(&results, &options);

        prop_assert_eq!(filtered.included.len() + filtered.excluded.len(), results.len());
        if include_bots {
            prop_assert!(filtered.excluded.is_empty());
        } else {
            prop_assert!(filtered.excluded.iter().all(|r| r.confidence_score >= threshold));
            prop_assert!(filtered.included.iter().all(|r| r.confidence_score < threshold));
        }
        prop_assert_eq!(&filtered, &partition(&results, &options));
    }

    #[test]
    fn raising_threshold_is_monotonic(
        results in results(),
        low in 0.0f64..=100.0,
        raise in 0.0f64..=100.0,
    ) {
        let at = |threshold: f64| {
            partition(&results, &FilterOptions {
                confidence_threshold: threshold,
                ..Default::default()
            })
        };
        let before = at(low);
        let after = at(low + raise);

        prop_assert!(after.included.len() >= before.included.len());
        prop_assert!(after.excluded.len() <= before.excluded.len());
    }
}

#[test]
fn result_serializes_camel_case() {
    let result = BotScorer::default().score(&UserActivity {
        user_id: "u-42".to_string(),
        is_datacenter_ip: true,
        ..Default::default()
    });

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["userId"], "u-42");
    assert_eq!(json["confidenceScore"], 20.0);
    assert_eq!(json["status"], "confirmed_human");
    assert_eq!(json["detectionReasons"][0], "Datacenter IP address");
}
