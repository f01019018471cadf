//! In-process packet filter engine.
//!
//! Stands in for a kernel-level filter on platforms where none is
//! wired up yet. Rule and policy state behave exactly like the real
//! engine's; traffic counters only move when decisions are injected,
//! which is also how tests drive the alert path.

use domain::common::entity::{Action, Protocol, Sense};
use domain::firewall::alert::PacketDecision;
use domain::firewall::entity::{DefaultPolicy, NativeRuleEntry};
use domain::firewall::error::FirewallError;
use domain::firewall::stats::{DirectionCounters, StatisticsSnapshot};
use domain::firewall::table::RuleTable;
use ports::secondary::packet_filter::{DecisionCallback, PacketFilterPort};

pub struct StubPacketFilter {
    initialized: bool,
    enabled: bool,
    tables: [RuleTable; 2],
    policy: DefaultPolicy,
    domains: Vec<String>,
    statistics: StatisticsSnapshot,
    callback: Option<DecisionCallback>,
}

impl StubPacketFilter {
    pub fn new(capacity_per_sense: usize) -> Self {
        Self {
            initialized: false,
            enabled: false,
            tables: [
                RuleTable::new(Sense::Inbound, capacity_per_sense),
                RuleTable::new(Sense::Outbound, capacity_per_sense),
            ],
            policy: DefaultPolicy::default(),
            domains: Vec::new(),
            statistics: StatisticsSnapshot::default(),
            callback: None,
        }
    }

    fn ready(&self) -> Result<(), FirewallError> {
        if self.initialized {
            Ok(())
        } else {
            Err(FirewallError::EngineUnavailable(
                "filter engine not initialized".to_string(),
            ))
        }
    }

    pub fn default_policy(&self) -> DefaultPolicy {
        self.policy
    }

    fn direction_counters(&mut self, sense: Sense) -> &mut DirectionCounters {
        match sense {
            Sense::Inbound => &mut self.statistics.inbound,
            Sense::Outbound => &mut self.statistics.outbound,
        }
    }

    /// Account one packet verdict and forward it to the registered
    /// callback, as the real engine's datapath would.
    pub fn inject_decision(&mut self, decision: PacketDecision) {
        let dropped = decision.action == Action::Drop;
        let counters = self.direction_counters(decision.sense);
        counters.total += 1;
        if dropped {
            counters.dropped += 1;
        }
        match decision.protocol {
            Protocol::Tcp => {
                counters.tcp += 1;
                if dropped {
                    counters.dropped_tcp += 1;
                }
            }
            Protocol::Udp => {
                counters.udp += 1;
                if dropped {
                    counters.dropped_udp += 1;
                }
            }
            Protocol::Icmp => {
                counters.icmp += 1;
                if dropped {
                    counters.dropped_icmp += 1;
                }
            }
            Protocol::Unknown => {}
        }
        if let Some(callback) = self.callback.as_ref() {
            callback(decision);
        }
    }
}

impl PacketFilterPort for StubPacketFilter {
    fn initialize(&mut self) -> Result<(), FirewallError> {
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), FirewallError> {
        self.ready()?;
        self.initialized = false;
        self.enabled = false;
        self.callback = None;
        Ok(())
    }

    fn enable(&mut self) -> Result<(), FirewallError> {
        self.ready()?;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), FirewallError> {
        self.ready()?;
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> Result<bool, FirewallError> {
        self.ready()?;
        Ok(self.enabled)
    }

    fn insert_rule(
        &mut self,
        sense: Sense,
        id: Option<u16>,
        entry: NativeRuleEntry,
    ) -> Result<u16, FirewallError> {
        self.ready()?;
        self.tables[sense.index()].insert(entry, id)
    }

    fn delete_rule(&mut self, sense: Sense, id: u16) -> Result<(), FirewallError> {
        self.ready()?;
        self.tables[sense.index()].remove(id).map(|_| ())
    }

    fn get_rules(&self, sense: Sense) -> Result<Vec<(u16, NativeRuleEntry)>, FirewallError> {
        self.ready()?;
        Ok(self.tables[sense.index()]
            .entries()
            .map(|(id, entry)| (id, *entry))
            .collect())
    }

    fn get_statistics(&self) -> Result<StatisticsSnapshot, FirewallError> {
        self.ready()?;
        Ok(self.statistics)
    }

    fn set_default_policy(&mut self, policy: DefaultPolicy) -> Result<(), FirewallError> {
        self.ready()?;
        self.policy = policy;
        Ok(())
    }

    fn set_domains(&mut self, domains: Vec<String>) -> Result<(), FirewallError> {
        self.ready()?;
        self.domains = domains;
        Ok(())
    }

    fn get_domains(&self) -> Result<Vec<String>, FirewallError> {
        self.ready()?;
        Ok(self.domains.clone())
    }

    fn register_decision_callback(
        &mut self,
        callback: DecisionCallback,
    ) -> Result<(), FirewallError> {
        self.ready()?;
        self.callback = Some(callback);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::firewall::alert::DecisionEndpoint;
    use domain::firewall::entity::MATCH_PROTOCOL;

    fn make_entry() -> NativeRuleEntry {
        NativeRuleEntry {
            match_flags: MATCH_PROTOCOL,
            action: Action::Drop,
            protocol: 6,
            ..NativeRuleEntry::default()
        }
    }

    fn make_decision(action: Action, protocol: Protocol) -> PacketDecision {
        PacketDecision {
            sense: Sense::Inbound,
            action,
            protocol,
            interface: 1,
            source: DecisionEndpoint::default(),
            destination: DecisionEndpoint::default(),
        }
    }

    #[test]
    fn calls_before_initialize_fail() {
        let mut engine = StubPacketFilter::new(8);
        assert!(matches!(
            engine.enable(),
            Err(FirewallError::EngineUnavailable(_))
        ));
        assert!(matches!(
            engine.insert_rule(Sense::Inbound, None, make_entry()),
            Err(FirewallError::EngineUnavailable(_))
        ));
        assert!(matches!(
            engine.get_statistics(),
            Err(FirewallError::EngineUnavailable(_))
        ));
    }

    #[test]
    fn rules_are_slot_addressed() {
        let mut engine = StubPacketFilter::new(8);
        engine.initialize().unwrap();
        let id0 = engine.insert_rule(Sense::Inbound, None, make_entry()).unwrap();
        let id1 = engine.insert_rule(Sense::Inbound, None, make_entry()).unwrap();
        assert_eq!((id0, id1), (0, 1));

        engine.delete_rule(Sense::Inbound, 0).unwrap();
        let rules = engine.get_rules(Sense::Inbound).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].0, 1);
    }

    #[test]
    fn injected_decisions_move_counters() {
        let mut engine = StubPacketFilter::new(8);
        engine.initialize().unwrap();
        engine.inject_decision(make_decision(Action::Drop, Protocol::Tcp));
        engine.inject_decision(make_decision(Action::Accept, Protocol::Udp));

        let stats = engine.get_statistics().unwrap();
        assert_eq!(stats.inbound.total, 2);
        assert_eq!(stats.inbound.tcp, 1);
        assert_eq!(stats.inbound.udp, 1);
        assert_eq!(stats.inbound.dropped, 1);
        assert_eq!(stats.inbound.dropped_tcp, 1);
        assert_eq!(stats.inbound.dropped_udp, 0);
    }

    #[test]
    fn callback_sees_injected_decisions() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut engine = StubPacketFilter::new(8);
        engine.initialize().unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_cb = Arc::clone(&seen);
        engine
            .register_decision_callback(Box::new(move |_| {
                seen_cb.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        engine.inject_decision(make_decision(Action::Drop, Protocol::Tcp));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_policy_is_last_write_wins() {
        let mut engine = StubPacketFilter::new(8);
        engine.initialize().unwrap();
        engine
            .set_default_policy(DefaultPolicy {
                inbound: Action::Drop,
                outbound: Action::Accept,
            })
            .unwrap();
        engine
            .set_default_policy(DefaultPolicy {
                inbound: Action::Accept,
                outbound: Action::Drop,
            })
            .unwrap();
        assert_eq!(engine.default_policy().outbound, Action::Drop);
        assert_eq!(engine.default_policy().inbound, Action::Accept);
    }

    #[test]
    fn shutdown_disables_and_clears_callback() {
        let mut engine = StubPacketFilter::new(8);
        engine.initialize().unwrap();
        engine.enable().unwrap();
        engine.shutdown().unwrap();
        assert!(matches!(
            engine.is_enabled(),
            Err(FirewallError::EngineUnavailable(_))
        ));
    }
}
