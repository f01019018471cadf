//! Drop-burst alert state machine.
//!
//! Each direction counts dropped packets. When a direction's counter
//! reaches its configured threshold an alert payload is queued, the
//! counter resets, and no further alert is produced until the queued
//! one has been drained and delivered. Drops that arrive while an
//! alert is in flight still count toward the next one.

use serde::{Deserialize, Serialize};

use crate::common::entity::{Action, Protocol, Sense};

/// One side of a packet as seen by the decision callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEndpoint {
    pub mac: [u8; 6],
    pub address: u32,
    pub port: u16,
}

/// A per-packet verdict reported by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketDecision {
    pub sense: Sense,
    pub action: Action,
    pub protocol: Protocol,
    pub interface: u8,
    pub source: DecisionEndpoint,
    pub destination: DecisionEndpoint,
}

/// Payload for one alert report, snapshotted from the decision that
/// crossed the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertPayload {
    pub sense: Sense,
    /// Dropped packets accumulated since the previous alert.
    pub packets: u32,
    pub interface: u8,
    pub protocol: Protocol,
    pub source: DecisionEndpoint,
    pub destination: DecisionEndpoint,
}

/// Alert configuration and accumulation state.
#[derive(Debug, Default)]
pub struct AlertContext {
    enabled: bool,
    /// Per-direction dropped-packet counters, indexed by `Sense::index`.
    counters: [u32; 2],
    /// Per-direction thresholds; zero disables that direction.
    thresholds: [u32; 2],
    in_progress: bool,
    queued: Option<AlertPayload>,
}

impl AlertContext {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_threshold(&mut self, sense: Sense, threshold: u32) {
        self.thresholds[sense.index()] = threshold;
    }

    pub fn threshold(&self, sense: Sense) -> u32 {
        self.thresholds[sense.index()]
    }

    pub fn dropped(&self, sense: Sense) -> u32 {
        self.counters[sense.index()]
    }

    /// Feed one packet decision. Accepted packets are ignored. A drop
    /// increments its direction's counter; crossing the threshold
    /// queues a payload unless one is already in flight.
    pub fn on_decision(&mut self, decision: &PacketDecision) {
        if decision.action != Action::Drop {
            return;
        }
        let idx = decision.sense.index();
        self.counters[idx] = self.counters[idx].saturating_add(1);

        let threshold = self.thresholds[idx];
        if !self.enabled || self.in_progress || threshold == 0 {
            return;
        }
        if self.counters[idx] >= threshold {
            self.queued = Some(AlertPayload {
                sense: decision.sense,
                packets: self.counters[idx],
                interface: decision.interface,
                protocol: decision.protocol,
                source: decision.source,
                destination: decision.destination,
            });
            self.counters[idx] = 0;
            self.in_progress = true;
        }
    }

    /// Take the queued payload, if any, and allow the next alert.
    pub fn drain(&mut self) -> Option<AlertPayload> {
        let payload = self.queued.take();
        if payload.is_some() {
            self.in_progress = false;
        }
        payload
    }
}
