//! Device-to-server message delivery.

use domain::firewall::error::FirewallError;
use domain::message::entity::Envelope;

/// Sends unsolicited reports (alerts, statistics) to the management
/// server.
pub trait OutboundPort: Send {
    fn publish(&self, envelope: &Envelope) -> Result<(), FirewallError>;
}
