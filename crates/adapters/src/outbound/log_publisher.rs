//! Outbound port that logs reports instead of sending them.
//!
//! Used when no transport to the management server is configured, so
//! alerts and statistics still surface in the device log.

use tracing::info;

use domain::firewall::error::FirewallError;
use domain::message::entity::Envelope;
use ports::secondary::outbound::OutboundPort;

#[derive(Default)]
pub struct LogPublisher;

impl LogPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl OutboundPort for LogPublisher {
    fn publish(&self, envelope: &Envelope) -> Result<(), FirewallError> {
        let fields = serde_json::to_string(&envelope.fields)
            .map_err(|e| FirewallError::Encode(e.to_string()))?;
        info!(kind = %envelope.kind, action = %envelope.action, %fields, "outbound report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn publish_accepts_any_envelope() {
        let publisher = LogPublisher::new();
        let envelope = Envelope::new(
            "ts.event.firewall.alert",
            "set",
            json!({"alert": {"packets": 3}}),
        );
        publisher.publish(&envelope).unwrap();
    }
}
