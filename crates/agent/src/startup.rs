//! Wiring: config to constructed controller.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use adapters::filter::stub::StubPacketFilter;
use adapters::outbound::log_publisher::LogPublisher;
use adapters::storage::file_config_store::FileConfigStore;
use application::alert_pipeline::AlertPipeline;
use application::controller::{ControllerLimits, FirewallController};
use infrastructure::config::AgentConfig;
use infrastructure::constants::{
    DECISION_CHANNEL_CAPACITY, MAX_PERSISTED_BYTES, MAX_RULES_PER_SENSE, MAX_WIRE_DOMAINS,
    MAX_WIRE_RULES,
};

/// Build the controller, apply the config file's firewall defaults,
/// then replay any persisted configuration on top of them.
pub fn build_controller(config: &AgentConfig, storage_dir: &str) -> Result<FirewallController> {
    let engine = StubPacketFilter::new(MAX_RULES_PER_SENSE);
    let store = FileConfigStore::new(storage_dir, MAX_PERSISTED_BYTES);
    let limits = ControllerLimits {
        max_wire_rules: MAX_WIRE_RULES,
        max_wire_domains: MAX_WIRE_DOMAINS,
    };

    let mut controller = FirewallController::new(
        Box::new(engine),
        Box::new(store),
        Box::new(LogPublisher::new()),
        AlertPipeline::new(DECISION_CHANNEL_CAPACITY),
        Duration::from_secs(config.firewall.statistics_reporting_interval),
        limits,
    );

    let fw = &config.firewall;
    let defaults = json!({
        "firewall": {
            "configuration": {
                "enable": fw.enabled,
                "default_policy": {
                    "default_policy_inbound": fw.default_policy_inbound,
                    "default_policy_outbound": fw.default_policy_outbound,
                },
                "default_domains": fw.default_domains,
                "alert_enabled": fw.alert_enabled,
                "alert_threshold_inbound": fw.alert_threshold_inbound,
                "alert_threshold_outbound": fw.alert_threshold_outbound,
                "statistics_reporting_interval": fw.statistics_reporting_interval,
            }
        }
    });
    controller
        .apply_boot_defaults(defaults)
        .context("applying firewall defaults from config")?;

    controller.restore();
    info!(storage_dir, "firewall controller ready");
    Ok(controller)
}
