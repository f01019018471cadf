//! Shared test doubles for port consumers.

use std::sync::Mutex;

use domain::firewall::error::FirewallError;
use domain::message::entity::Envelope;

use crate::secondary::outbound::OutboundPort;

/// Outbound port that records every published envelope.
#[derive(Default)]
pub struct RecordingOutbound {
    published: Mutex<Vec<Envelope>>,
}

impl RecordingOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<Envelope> {
        self.published.lock().expect("outbound mutex").clone()
    }

    pub fn published_count(&self) -> usize {
        self.published.lock().expect("outbound mutex").len()
    }
}

impl OutboundPort for RecordingOutbound {
    fn publish(&self, envelope: &Envelope) -> Result<(), FirewallError> {
        self.published
            .lock()
            .expect("outbound mutex")
            .push(envelope.clone());
        Ok(())
    }
}

/// Outbound port that drops everything.
#[derive(Default)]
pub struct NoopOutbound;

impl OutboundPort for NoopOutbound {
    fn publish(&self, _envelope: &Envelope) -> Result<(), FirewallError> {
        Ok(())
    }
}

/// Outbound port that always fails, for delivery-error paths.
#[derive(Default)]
pub struct FailingOutbound;

impl OutboundPort for FailingOutbound {
    fn publish(&self, _envelope: &Envelope) -> Result<(), FirewallError> {
        Err(FirewallError::Io("outbound link down".to_string()))
    }
}
