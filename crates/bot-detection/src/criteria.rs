//! Detection criteria configuration

use crate::DetectionError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Signal that contributes a fixed weight when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSignal {
    /// Score added when the signal is present
    pub weight: f64,
}

/// Signal that contributes its weight when a measurement exceeds a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSignal {
    /// Score added when the measurement exceeds `threshold`
    pub weight: f64,
    /// Exclusive lower bound that triggers the signal
    pub threshold: f64,
}

/// User-agent substring patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAgentCriterion {
    /// Score added when any pattern matches
    pub weight: f64,
    /// Self-identifying crawlers and automation frameworks
    pub known_bots: Vec<String>,
    /// Generic HTTP clients rarely used by people
    pub suspicious: Vec<String>,
}

impl UserAgentCriterion {
    /// Case-insensitive substring match against any pattern. Empty patterns never match.
    pub fn matches(&self, user_agent: &str) -> bool {
        let user_agent = user_agent.to_lowercase();
        self.known_bots
            .iter()
            .chain(self.suspicious.iter())
            .filter(|p| !p.is_empty())
            .any(|p| user_agent.contains(&p.to_lowercase()))
    }
}

/// Client behavior signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralCriteria {
    /// Client reported no JavaScript support
    pub no_javascript: WeightedSignal,
    /// Threshold in pages per second
    pub rapid_navigation: ThresholdSignal,
    /// Viewing pattern flagged as unusual
    pub unusual_viewing_patterns: WeightedSignal,
}

/// Network origin signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpCriteria {
    /// Address belongs to a hosting provider
    pub datacenter_ip: WeightedSignal,
    /// Address is a known VPN or proxy exit
    pub vpn_detection: WeightedSignal,
    /// Location inconsistent with the session
    pub geographic_anomalies: WeightedSignal,
}

/// Weights and thresholds for every scored signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionCriteria {
    /// Threshold in requests per minute
    pub request_frequency: ThresholdSignal,
    /// Known bot and scripted-client user agents
    pub user_agent_patterns: UserAgentCriterion,
    pub behavioral: BehavioralCriteria,
    pub ip_analysis: IpCriteria,
}

impl Default for DetectionCriteria {
    fn default() -> Self {
        let patterns =
            |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            request_frequency: ThresholdSignal {
                weight: 30.0,
                threshold: 60.0,
            },
            user_agent_patterns: UserAgentCriterion {
                weight: 25.0,
                known_bots: patterns(&[
                    "bot", "crawler", "spider", "scraper", "headless", "phantomjs", "selenium",
                    "puppeteer", "playwright",
                ]),
                suspicious: patterns(&[
                    "curl", "wget", "python-requests", "python-urllib", "java/", "go-http-client",
                    "okhttp", "libwww-perl",
                ]),
            },
            behavioral: BehavioralCriteria {
                no_javascript: WeightedSignal { weight: 15.0 },
                rapid_navigation: ThresholdSignal {
                    weight: 20.0,
                    threshold: 5.0,
                },
                unusual_viewing_patterns: WeightedSignal { weight: 10.0 },
            },
            ip_analysis: IpCriteria {
                datacenter_ip: WeightedSignal { weight: 20.0 },
                vpn_detection: WeightedSignal { weight: 10.0 },
                geographic_anomalies: WeightedSignal { weight: 15.0 },
            },
        }
    }
}

impl DetectionCriteria {
    /// Parse criteria from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, DetectionError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load criteria from a file, with `ADMIN_BOTS__*` environment overrides
    pub fn load(path: &str) -> Result<Self, DetectionError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("ADMIN_BOTS").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
