//! Abstraction over the device's packet filter engine.

use domain::common::entity::Sense;
use domain::firewall::alert::PacketDecision;
use domain::firewall::entity::{DefaultPolicy, NativeRuleEntry};
use domain::firewall::error::FirewallError;
use domain::firewall::stats::StatisticsSnapshot;

/// Invoked by the engine for each packet verdict. Implementations must
/// not block: the engine may call from a latency-sensitive context.
pub type DecisionCallback = Box<dyn Fn(PacketDecision) + Send + Sync>;

/// Driver-facing operations on the packet filter engine. Every call
/// before `initialize` (or after `shutdown`) fails with
/// `EngineUnavailable`.
pub trait PacketFilterPort: Send {
    fn initialize(&mut self) -> Result<(), FirewallError>;
    fn shutdown(&mut self) -> Result<(), FirewallError>;

    fn enable(&mut self) -> Result<(), FirewallError>;
    fn disable(&mut self) -> Result<(), FirewallError>;
    fn is_enabled(&self) -> Result<bool, FirewallError>;

    /// Install a rule. `id` addresses an exact slot (overwriting any
    /// occupant); `None` takes the lowest free slot. Returns the slot
    /// the rule landed on.
    fn insert_rule(
        &mut self,
        sense: Sense,
        id: Option<u16>,
        entry: NativeRuleEntry,
    ) -> Result<u16, FirewallError>;

    fn delete_rule(&mut self, sense: Sense, id: u16) -> Result<(), FirewallError>;

    /// Installed rules in ascending slot order.
    fn get_rules(&self, sense: Sense) -> Result<Vec<(u16, NativeRuleEntry)>, FirewallError>;

    fn get_statistics(&self) -> Result<StatisticsSnapshot, FirewallError>;

    fn set_default_policy(&mut self, policy: DefaultPolicy) -> Result<(), FirewallError>;

    fn set_domains(&mut self, domains: Vec<String>) -> Result<(), FirewallError>;
    fn get_domains(&self) -> Result<Vec<String>, FirewallError>;

    fn register_decision_callback(
        &mut self,
        callback: DecisionCallback,
    ) -> Result<(), FirewallError>;
}
