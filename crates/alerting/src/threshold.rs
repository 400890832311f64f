//! Alert thresholds and their configuration

use crate::AlertError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monitored system metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// CPU usage (%)
    Cpu,
    /// Memory usage (%)
    Memory,
    /// Disk usage (%)
    Disk,
    /// API error rate (%)
    #[serde(alias = "apiErrorRate")]
    ApiErrorRate,
    /// Database latency (ms)
    #[serde(alias = "dbLatency")]
    DbLatency,
    /// Request rate (req/s)
    Traffic,
    /// Service downtime (s)
    Downtime,
}

impl AlertType {
    /// All alert types, in evaluation order
    pub const ALL: [AlertType; 7] = [
        AlertType::Cpu,
        AlertType::Memory,
        AlertType::Disk,
        AlertType::ApiErrorRate,
        AlertType::DbLatency,
        AlertType::Traffic,
        AlertType::Downtime,
    ];

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Cpu => "cpu",
            AlertType::Memory => "memory",
            AlertType::Disk => "disk",
            AlertType::ApiErrorRate => "api_error_rate",
            AlertType::DbLatency => "db_latency",
            AlertType::Traffic => "traffic",
            AlertType::Downtime => "downtime",
        }
    }

    /// Human-readable alert message for a breaching value
    pub fn message(&self, value: f64, threshold: f64) -> String {
        match self {
            AlertType::Cpu => format!(
                "High CPU usage detected: {}% (threshold: {}%)",
                fixed(value, 1), threshold
            ),
            AlertType::Memory => format!(
                "High memory usage detected: {}% (threshold: {}%)",
                fixed(value, 1), threshold
            ),
            AlertType::Disk => format!(
                "High disk usage detected: {}% (threshold: {}%)",
                fixed(value, 1), threshold
            ),
            AlertType::ApiErrorRate => format!(
                "High API error rate detected: {}% (threshold: {}%)",
                fixed(value, 2), threshold
            ),
            AlertType::DbLatency => format!(
                "High database latency detected: {}ms (threshold: {}ms)",
                fixed(value, 0), threshold
            ),
            AlertType::Traffic => format!(
                "Traffic spike detected: {} req/s (threshold: {} req/s)",
                fixed(value, 0), threshold
            ),
            AlertType::Downtime => format!(
                "Service downtime detected: {}s (threshold: {}s)",
                fixed(value, 0), threshold
            ),
        }
    }
}

/// Format with `decimals` places, rounding ties away from zero
fn fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() {
        format!("{:.*}", decimals, rounded)
    } else {
        format!("{:.*}", decimals, value)
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(AlertType::Cpu),
            "memory" => Ok(AlertType::Memory),
            "disk" => Ok(AlertType::Disk),
            "api_error_rate" | "apiErrorRate" => Ok(AlertType::ApiErrorRate),
            "db_latency" | "dbLatency" => Ok(AlertType::DbLatency),
            "traffic" => Ok(AlertType::Traffic),
            "downtime" => Ok(AlertType::Downtime),
            other => Err(AlertError::UnknownType(other.to_string())),
        }
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Threshold for a single metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    /// Metric this threshold watches
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Severity assigned to alerts it raises
    pub severity: AlertSeverity,
    /// Alert fires when the metric is strictly above this value
    pub threshold: f64,
    /// Sustain duration in seconds (carried, not enforced)
    #[serde(default)]
    pub duration: u64,
    /// Disabled thresholds are skipped
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl AlertThreshold {
    /// Create an enabled threshold with a 60s duration
    pub fn new(alert_type: AlertType, severity: AlertSeverity, threshold: f64) -> Self {
        Self {
            alert_type,
            severity,
            threshold,
            duration: 60,
            enabled: true,
        }
    }
}

/// Alert engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEngineConfig {
    /// Thresholds, evaluated in order
    pub thresholds: Vec<AlertThreshold>,
}

impl Default for AlertEngineConfig {
    fn default() -> Self {
        use AlertSeverity::*;
        Self {
            thresholds: vec![
                AlertThreshold::new(AlertType::Cpu, High, 80.0),
                AlertThreshold::new(AlertType::Memory, High, 85.0),
                AlertThreshold::new(AlertType::Disk, Critical, 90.0),
                AlertThreshold::new(AlertType::ApiErrorRate, High, 5.0),
                AlertThreshold::new(AlertType::DbLatency, Medium, 1000.0),
                AlertThreshold::new(AlertType::Traffic, Medium, 1000.0),
                AlertThreshold::new(AlertType::Downtime, Critical, 60.0),
            ],
        }
    }
}

impl AlertEngineConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, AlertError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a file, with `ADMIN_ALERTS__*` environment overrides
    pub fn load(path: &str) -> Result<Self, AlertError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("ADMIN_ALERTS").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
