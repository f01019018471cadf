//! Decision intake and alert delivery.
//!
//! The engine's decision callback may run on a thread this subsystem
//! does not control, so it only enqueues onto a bounded channel and
//! returns. The cooperative `tick` drains the channel into the alert
//! state machine and delivers any queued alert, making `tick` the sole
//! synchronization point. A full channel sheds decisions rather than
//! blocking the datapath.

use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};

use serde_json::json;
use tracing::{debug, warn};

use domain::codec;
use domain::common::entity::Sense;
use domain::firewall::alert::{AlertContext, AlertPayload, DecisionEndpoint, PacketDecision};
use domain::firewall::entity::interface_name;
use domain::message::entity::{Envelope, KIND_ALERT};
use ports::secondary::outbound::OutboundPort;
use ports::secondary::packet_filter::DecisionCallback;

pub struct AlertPipeline {
    ctx: AlertContext,
    tx: SyncSender<PacketDecision>,
    rx: Receiver<PacketDecision>,
}

impl AlertPipeline {
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, rx) = sync_channel(channel_capacity);
        Self {
            ctx: AlertContext::default(),
            tx,
            rx,
        }
    }

    /// Callback handed to the engine. Never blocks; decisions that do
    /// not fit in the channel are dropped.
    pub fn callback(&self) -> DecisionCallback {
        let tx = self.tx.clone();
        Box::new(move |decision| {
            if let Err(TrySendError::Full(_)) = tx.try_send(decision) {
                debug!("decision channel full, shedding");
            }
        })
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.ctx.set_enabled(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.ctx.is_enabled()
    }

    pub fn set_threshold(&mut self, sense: Sense, threshold: u32) {
        self.ctx.set_threshold(sense, threshold);
    }

    pub fn threshold(&self, sense: Sense) -> u32 {
        self.ctx.threshold(sense)
    }

    /// Drain pending decisions and deliver at most one queued alert.
    /// Delivery failures are logged and the alert is discarded so the
    /// pipeline never wedges.
    pub fn tick(&mut self, outbound: &dyn OutboundPort, time: u64) {
        while let Ok(decision) = self.rx.try_recv() {
            self.ctx.on_decision(&decision);
        }
        if let Some(payload) = self.ctx.drain() {
            let envelope = alert_envelope(&payload, time);
            if let Err(e) = outbound.publish(&envelope) {
                warn!(error = %e, "alert delivery failed");
            }
        }
    }
}

fn endpoint_fields(endpoint: &DecisionEndpoint) -> serde_json::Value {
    json!({
        "address": codec::format_ipv4(endpoint.address),
        "mac": codec::format_mac(endpoint.mac),
        "port": endpoint.port,
    })
}

fn alert_envelope(payload: &AlertPayload, time: u64) -> Envelope {
    let fields = json!({
        "time": time,
        "packets": payload.packets,
        "sense": payload.sense.as_str(),
        "interface": interface_name(payload.interface),
        "protocol": payload.protocol.as_str(),
        "source": endpoint_fields(&payload.source),
        "destination": endpoint_fields(&payload.destination),
    });
    Envelope::new(KIND_ALERT, "set", fields)
}
