//! Enablement state tracking for the filter engine.
//!
//! The engine's enable/disable calls are not idempotent on every
//! backend, so the bridge remembers what was last pushed and only
//! forwards actual transitions.

use tracing::info;

use domain::firewall::error::FirewallError;
use ports::secondary::packet_filter::PacketFilterPort;

#[derive(Debug, Default)]
pub struct EngineBridge {
    last_pushed: Option<bool>,
}

impl EngineBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the effective enablement to the engine if it differs from
    /// what the engine last received.
    pub fn set_enabled(
        &mut self,
        engine: &mut dyn PacketFilterPort,
        effective: bool,
    ) -> Result<(), FirewallError> {
        if self.last_pushed == Some(effective) {
            return Ok(());
        }
        if effective {
            engine.enable()?;
        } else {
            engine.disable()?;
        }
        info!(enabled = effective, "filter enablement pushed");
        self.last_pushed = Some(effective);
        Ok(())
    }

    pub fn last_pushed(&self) -> Option<bool> {
        self.last_pushed
    }
}
