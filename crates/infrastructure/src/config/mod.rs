//! Agent configuration: structs, parsing, and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_STATISTICS_INTERVAL_SECS, DEFAULT_STORAGE_DIR, MAX_WIRE_DOMAINS,
};

// ── Config errors ─────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub agent: AgentInfo,

    #[serde(default)]
    pub firewall: FirewallSection,
}

impl AgentConfig {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config after deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.storage_dir.is_empty() {
            return Err(ConfigError::Validation {
                field: "agent.storage_dir".to_string(),
                message: "storage directory must not be empty".to_string(),
            });
        }
        if self.firewall.statistics_reporting_interval == 0 {
            return Err(ConfigError::Validation {
                field: "firewall.statistics_reporting_interval".to_string(),
                message: "interval must be at least one second".to_string(),
            });
        }
        if self.firewall.default_domains.len() > MAX_WIRE_DOMAINS {
            return Err(ConfigError::Validation {
                field: "firewall.default_domains".to_string(),
                message: format!("at most {MAX_WIRE_DOMAINS} domains allowed"),
            });
        }
        for (field, value) in [
            (
                "default_policy_inbound",
                self.firewall.default_policy_inbound.as_str(),
            ),
            (
                "default_policy_outbound",
                self.firewall.default_policy_outbound.as_str(),
            ),
        ] {
            if value != "accept" && value != "drop" {
                return Err(ConfigError::Validation {
                    field: format!("firewall.{field}"),
                    message: format!("'{value}' is not one of accept|drop"),
                });
            }
        }
        Ok(())
    }
}

// ── Agent info ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Directory holding the persisted firewall configuration.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
}

impl Default for AgentInfo {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            storage_dir: default_storage_dir(),
        }
    }
}

// ── Firewall section ──────────────────────────────────────────────

/// Boot-time firewall defaults, applied before any persisted or
/// server-pushed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_accept")]
    pub default_policy_inbound: String,

    #[serde(default = "default_accept")]
    pub default_policy_outbound: String,

    #[serde(default)]
    pub default_domains: Vec<String>,

    #[serde(default)]
    pub alert_enabled: bool,

    #[serde(default)]
    pub alert_threshold_inbound: u32,

    #[serde(default)]
    pub alert_threshold_outbound: u32,

    #[serde(default = "default_statistics_interval")]
    pub statistics_reporting_interval: u64,
}

impl Default for FirewallSection {
    fn default() -> Self {
        Self {
            enabled: false,
            default_policy_inbound: default_accept(),
            default_policy_outbound: default_accept(),
            default_domains: Vec::new(),
            alert_enabled: false,
            alert_threshold_inbound: 0,
            alert_threshold_outbound: 0,
            statistics_reporting_interval: default_statistics_interval(),
        }
    }
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}
fn default_log_format() -> LogFormat {
    LogFormat::Json
}
fn default_storage_dir() -> String {
    DEFAULT_STORAGE_DIR.to_string()
}
fn default_accept() -> String {
    "accept".to_string()
}
fn default_statistics_interval() -> u64 {
    DEFAULT_STATISTICS_INTERVAL_SECS
}

// ── Log level ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "invalid log level '{s}': expected error|warn|info|debug|trace"
            )),
        }
    }
}

// ── Log format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => Err(format!("invalid log format '{s}': expected json|text")),
        }
    }
}
