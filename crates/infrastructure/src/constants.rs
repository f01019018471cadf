//! Agent-wide constants.

/// Default path of the agent configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/edgewall/config.yaml";

/// Default directory for the persisted firewall configuration.
pub const DEFAULT_STORAGE_DIR: &str = "/var/lib/edgewall";

/// Rule slots per traffic direction. Pools are pre-sized and never
/// grow; exceeding this is a recoverable request error.
pub const MAX_RULES_PER_SENSE: usize = 32;

/// Maximum rules accepted in one management message.
pub const MAX_WIRE_RULES: usize = 32;

/// Maximum domain names accepted in one management message.
pub const MAX_WIRE_DOMAINS: usize = 16;

/// Upper bound on the encoded persisted configuration document.
pub const MAX_PERSISTED_BYTES: usize = 16 * 1024;

/// Packet decisions buffered between the engine callback and `tick`.
pub const DECISION_CHANNEL_CAPACITY: usize = 256;

/// Default seconds between statistics reports.
pub const DEFAULT_STATISTICS_INTERVAL_SECS: u64 = 300;

/// Cadence of the cooperative tick, in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 250;
