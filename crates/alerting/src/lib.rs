//! Alerting System
//!
//! Evaluates system-health metric snapshots against configured thresholds,
//! raises and resolves alerts, and notifies subscribers of new alerts.

mod engine;
mod error;
mod threshold;

pub use engine::{Alert, AlertCallback, AlertEngine, SubscriptionId};
pub use error::AlertError;
pub use threshold::{AlertEngineConfig, AlertSeverity, AlertThreshold, AlertType};
