//! Alert Engine Implementation

use crate::threshold::{AlertEngineConfig, AlertSeverity, AlertThreshold, AlertType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Alert raised for a threshold breach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Unique alert ID
    pub id: Uuid,
    /// Metric that breached
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Severity copied from the threshold
    pub severity: AlertSeverity,
    /// Human-readable description
    pub message: String,
    /// Metric value that raised the alert
    pub value: f64,
    /// Threshold in force when raised
    pub threshold: f64,
    /// When the alert was raised
    pub timestamp: DateTime<Utc>,
    /// Whether the metric has recovered
    pub resolved: bool,
    /// When the alert was resolved
    pub resolved_at: Option<DateTime<Utc>>,
    /// Whether an operator has seen the alert
    #[serde(default)]
    pub acknowledged: bool,
}

impl Alert {
    fn raise(threshold: &AlertThreshold, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            alert_type: threshold.alert_type,
            severity: threshold.severity,
            message: threshold.alert_type.message(value, threshold.threshold),
            value,
            threshold: threshold.threshold,
            timestamp: Utc::now(),
            resolved: false,
            resolved_at: None,
            acknowledged: false,
        }
    }

    fn resolve(&mut self) {
        self.resolved = true;
        self.resolved_at = Some(Utc::now());
    }
}

/// Callback invoked once for every newly raised alert
pub type AlertCallback = Box<dyn Fn(&Alert) + Send + Sync>;

/// Handle returned by [`AlertEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Threshold alert engine
///
/// Holds at most one unresolved alert per [`AlertType`]. Alerts are never
/// removed by evaluation, only marked resolved.
pub struct AlertEngine {
    /// Configured thresholds
    thresholds: Vec<AlertThreshold>,
    /// Alert history in insertion order
    alerts: Vec<Alert>,
    /// Subscribers in registration order
    subscribers: Vec<(SubscriptionId, AlertCallback)>,
    /// Next subscription handle
    next_subscription: u64,
}

impl AlertEngine {
    /// Create a new alert engine
    pub fn new(config: AlertEngineConfig) -> Self {
        info!(
            "Creating alert engine with {} thresholds",
            config.thresholds.len()
        );
        Self {
            thresholds: config.thresholds,
            alerts: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Evaluate a metric snapshot against every enabled threshold
    ///
    /// Returns the alerts raised by this pass. Metrics without a threshold,
    /// thresholds without a metric, and NaN values are skipped. Each type is
    /// evaluated once, against its first enabled threshold.
    pub fn check_metrics(&mut self, metrics: &HashMap<AlertType, f64>) -> Vec<Alert> {
        let mut raised = Vec::new();
        let mut evaluated = HashSet::new();

        for threshold in self.thresholds.iter().filter(|t| t.enabled) {
            if !evaluated.insert(threshold.alert_type) {
                debug!(
                    "Skipping extra {} threshold {}",
                    threshold.alert_type, threshold.threshold
                );
                continue;
            }

            let Some(&value) = metrics.get(&threshold.alert_type) else {
                continue;
            };

            if value.is_nan() {
                warn!("Skipping NaN value for {}", threshold.alert_type);
                continue;
            }

            let active = self
                .alerts
                .iter()
                .position(|a| a.alert_type == threshold.alert_type && !a.resolved);

            if value > threshold.threshold {
                if active.is_some() {
                    debug!(
                        "Alert suppressed: {} already active ({} > {})",
                        threshold.alert_type, value, threshold.threshold
                    );
                    continue;
                }

                let alert = Alert::raise(threshold, value);
                info!("Alert raised: {} ({})", alert.alert_type, alert.message);

                for (_, callback) in &self.subscribers {
                    callback(&alert);
                }

                raised.push(alert.clone());
                self.alerts.push(alert);
            } else if let Some(index) = active {
                let alert = &mut self.alerts[index];
                alert.resolve();
                info!(
                    "Alert resolved: {} ({} <= {})",
                    alert.alert_type, value, threshold.threshold
                );
            }
        }

        raised
    }

    /// Evaluate a snapshot keyed by metric name, skipping unknown names
    ///
    /// When several names map to one type, the canonical snake_case name wins,
    /// then the alphabetically first alias.
    pub fn check_named_metrics(&mut self, metrics: &HashMap<String, f64>) -> Vec<Alert> {
        let mut named: Vec<(AlertType, &str, f64)> = metrics
            .iter()
            .filter_map(|(name, &value)| match name.parse::<AlertType>() {
                Ok(alert_type) => Some((alert_type, name.as_str(), value)),
                Err(e) => {
                    debug!("Skipping metric: {}", e);
                    None
                }
            })
            .collect();

        named.sort_by(|a, b| {
            (a.1 != a.0.as_str(), a.1).cmp(&(b.1 != b.0.as_str(), b.1))
        });

        let mut typed = HashMap::new();
        for (alert_type, name, value) in named {
            match typed.entry(alert_type) {
                Entry::Occupied(_) => {
                    debug!("Duplicate metric {} for {}, keeping first", name, alert_type)
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }

        self.check_metrics(&typed)
    }

    /// Register a callback for newly raised alerts
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Alert) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Unresolved alerts
    pub fn active_alerts(&self) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| !a.resolved).collect()
    }

    /// Every alert ever raised, oldest first
    pub fn alert_history(&self) -> &[Alert] {
        &self.alerts
    }

    /// Current thresholds
    pub fn thresholds(&self) -> &[AlertThreshold] {
        &self.thresholds
    }

    /// Replace the threshold configuration
    pub fn set_thresholds(&mut self, thresholds: Vec<AlertThreshold>) {
        info!("Replacing {} thresholds", thresholds.len());
        self.thresholds = thresholds;
    }

    /// Acknowledge an alert
    pub fn acknowledge(&mut self, id: Uuid) -> bool {
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) {
            alert.acknowledged = true;
            info!("Alert acknowledged: {}", id);
            true
        } else {
            false
        }
    }

    /// Manually resolve an active alert
    pub fn resolve(&mut self, id: Uuid) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id && !a.resolved) {
            Some(alert) => {
                alert.resolve();
                info!("Alert resolved manually: {}", id);
                true
            }
            None => false,
        }
    }

    /// Drop resolved alerts from history
    pub fn clear_history(&mut self) {
        self.alerts.retain(|a| !a.resolved);
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(AlertEngineConfig::default())
    }
}
