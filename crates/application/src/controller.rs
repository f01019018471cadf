//! Request dispatch and firewall state ownership.
//!
//! One controller instance owns the engine handle, the persistence
//! store, the outbound sink, and all mutable firewall state. Requests
//! arrive as envelopes and are mutated in place into replies; the
//! cooperative `tick` drives alert delivery and interval statistics.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use domain::common::entity::{Action, Sense};
use domain::firewall::entity::{DefaultPolicy, WireRule};
use domain::firewall::error::FirewallError;
use domain::firewall::translate::{native_to_wire, wire_to_native};
use domain::message::entity::{Envelope, KIND_FIREWALL, MessageAction};
use ports::secondary::config_store::ConfigStorePort;
use ports::secondary::outbound::OutboundPort;
use ports::secondary::packet_filter::PacketFilterPort;

use crate::alert_pipeline::AlertPipeline;
use crate::engine_bridge::EngineBridge;
use crate::statistics::StatisticsReporter;

/// Protocol-level bounds on inbound documents.
#[derive(Debug, Clone, Copy)]
pub struct ControllerLimits {
    pub max_wire_rules: usize,
    pub max_wire_domains: usize,
}

impl Default for ControllerLimits {
    fn default() -> Self {
        Self {
            max_wire_rules: 32,
            max_wire_domains: 16,
        }
    }
}

pub struct FirewallController {
    engine: Box<dyn PacketFilterPort>,
    store: Box<dyn ConfigStorePort>,
    outbound: Box<dyn OutboundPort>,
    bridge: EngineBridge,
    alerts: AlertPipeline,
    statistics: StatisticsReporter,
    limits: ControllerLimits,
    enabled: bool,
    suspended: bool,
    default_policy: DefaultPolicy,
    default_domains: Vec<String>,
    default_rules: Vec<WireRule>,
    save_suppressed: bool,
}

impl FirewallController {
    pub fn new(
        mut engine: Box<dyn PacketFilterPort>,
        store: Box<dyn ConfigStorePort>,
        outbound: Box<dyn OutboundPort>,
        alerts: AlertPipeline,
        statistics_interval: Duration,
        limits: ControllerLimits,
    ) -> Self {
        // An engine that fails to come up leaves the firewall
        // unenforced; the agent itself keeps running.
        match engine.initialize() {
            Ok(()) => {
                if let Err(e) = engine.register_decision_callback(alerts.callback()) {
                    warn!(error = %e, "decision callback registration failed");
                }
            }
            Err(e) => error!(error = %e, "filter engine initialization failed"),
        }

        Self {
            engine,
            store,
            outbound,
            bridge: EngineBridge::new(),
            alerts,
            statistics: StatisticsReporter::new(statistics_interval),
            limits,
            enabled: false,
            suspended: false,
            default_policy: DefaultPolicy::default(),
            default_domains: Vec::new(),
            default_rules: Vec::new(),
            save_suppressed: false,
        }
    }

    fn effective_enabled(&self) -> bool {
        self.enabled && !self.suspended
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Temporarily lift enforcement without losing configuration.
    pub fn suspend(&mut self) -> Result<(), FirewallError> {
        self.suspended = true;
        let effective = self.effective_enabled();
        self.bridge.set_enabled(self.engine.as_mut(), effective)
    }

    pub fn resume(&mut self) -> Result<(), FirewallError> {
        self.suspended = false;
        let effective = self.effective_enabled();
        self.bridge.set_enabled(self.engine.as_mut(), effective)
    }

    // ── Dispatch ──────────────────────────────────────────────────

    /// Handle one management request, mutating it into the reply.
    pub fn handle(&mut self, envelope: &mut Envelope) -> Result<(), FirewallError> {
        if envelope.kind != KIND_FIREWALL {
            return Err(FirewallError::BadRequest(format!(
                "unsupported kind '{}'",
                envelope.kind
            )));
        }
        match MessageAction::parse(&envelope.action)? {
            MessageAction::Set => self.handle_set(envelope),
            MessageAction::Get => self.handle_get(envelope),
            MessageAction::Delete => self.handle_delete(envelope),
            MessageAction::Update => Err(FirewallError::BadRequest(
                "action 'update' is not implemented".to_string(),
            )),
        }
    }

    /// The request document: `fields.firewall` when present, otherwise
    /// `fields` itself.
    fn request_document<'a>(envelope: &'a Envelope) -> &'a Value {
        match envelope.fields.get("firewall") {
            Some(doc) if doc.is_object() => doc,
            _ => &envelope.fields,
        }
    }

    fn handle_set(&mut self, envelope: &mut Envelope) -> Result<(), FirewallError> {
        let doc = Self::request_document(envelope).clone();
        if !doc.is_object() {
            return Err(FirewallError::BadRequest(
                "'set' requires a firewall document".to_string(),
            ));
        }

        if let Some(configuration) = doc.get("configuration") {
            self.apply_configuration(configuration)?;
        }
        let effective = self.effective_enabled();
        self.bridge.set_enabled(self.engine.as_mut(), effective)?;

        if let Some(rules) = doc.get("rules") {
            self.apply_rules(rules)?;
        }
        if let Some(default_rules) = doc.get("default_rules") {
            self.default_rules = self.apply_rules(default_rules)?;
        }
        if let Some(domains) = doc.get("domains") {
            self.apply_domains(domains)?;
        }

        self.persist()?;
        envelope.fields = json!({"status": "success"});
        Ok(())
    }

    fn handle_get(&mut self, envelope: &mut Envelope) -> Result<(), FirewallError> {
        let nested = matches!(envelope.fields.get("firewall"), Some(v) if v.is_object());
        let requested = Self::request_document(envelope).clone();
        let Some(requested) = requested.as_object() else {
            return Err(FirewallError::BadRequest(
                "'get' requires an object of requested keys".to_string(),
            ));
        };

        let mut reply = serde_json::Map::new();
        for key in requested.keys() {
            let value = match key.as_str() {
                "configuration" => self.configuration_fields(),
                "rules" => json!(self.enumerate_rules()?),
                "default_rules" => json!(self.default_rules),
                "domains" => json!(self.engine.get_domains()?),
                "statistics" => {
                    StatisticsReporter::snapshot_fields(&self.engine.get_statistics()?)
                }
                other => {
                    return Err(FirewallError::BadRequest(format!(
                        "unknown query key '{other}'"
                    )));
                }
            };
            reply.insert(key.clone(), value);
        }

        envelope.fields = if nested {
            json!({"firewall": Value::Object(reply)})
        } else {
            Value::Object(reply)
        };
        Ok(())
    }

    fn handle_delete(&mut self, envelope: &mut Envelope) -> Result<(), FirewallError> {
        let doc = Self::request_document(envelope).clone();
        let Some(rules) = doc.get("rules").and_then(Value::as_array) else {
            return Err(FirewallError::BadRequest(
                "'delete' requires a rules array".to_string(),
            ));
        };

        for rule in rules {
            let wire: WireRule = serde_json::from_value(rule.clone())
                .map_err(|e| FirewallError::BadRequest(format!("malformed rule: {e}")))?;
            let Some(id) = wire.id else {
                return Err(FirewallError::BadRequest(
                    "'delete' rules must carry an id".to_string(),
                ));
            };
            let sense = Sense::from_wire(wire.sense.as_deref());
            self.engine.delete_rule(sense, id)?;
            info!(%sense, id, "rule deleted");
        }

        self.persist()?;
        envelope.fields = json!({"status": "success"});
        Ok(())
    }

    // ── Set helpers ───────────────────────────────────────────────

    fn apply_configuration(&mut self, configuration: &Value) -> Result<(), FirewallError> {
        let Some(obj) = configuration.as_object() else {
            return Err(FirewallError::BadRequest(
                "'configuration' must be an object".to_string(),
            ));
        };

        if let Some(enable) = obj.get("enable") {
            self.enabled = enable.as_bool().ok_or_else(|| {
                FirewallError::BadRequest("'enable' must be a boolean".to_string())
            })?;
        }
        if let Some(suspend) = obj.get("suspend") {
            self.suspended = suspend.as_bool().ok_or_else(|| {
                FirewallError::BadRequest("'suspend' must be a boolean".to_string())
            })?;
        }

        if let Some(policy) = obj.get("default_policy").and_then(Value::as_object) {
            let inbound = policy.get("default_policy_inbound").and_then(Value::as_str);
            let outbound = policy
                .get("default_policy_outbound")
                .and_then(Value::as_str);
            self.default_policy = DefaultPolicy {
                inbound: Action::from_wire(inbound),
                outbound: Action::from_wire(outbound),
            };
            self.engine.set_default_policy(self.default_policy)?;
        }

        if let Some(default_domains) = obj.get("default_domains") {
            self.default_domains = self.parse_domains(default_domains)?;
        }

        if let Some(alert_enabled) = obj.get("alert_enabled").and_then(Value::as_bool) {
            self.alerts.set_enabled(alert_enabled);
        }
        for (key, sense) in [
            ("alert_threshold_inbound", Sense::Inbound),
            ("alert_threshold_outbound", Sense::Outbound),
        ] {
            if let Some(threshold) = obj.get(key).and_then(Value::as_u64) {
                let threshold = u32::try_from(threshold).map_err(|_| {
                    FirewallError::BadRequest(format!("'{key}' out of range"))
                })?;
                self.alerts.set_threshold(sense, threshold);
            }
        }

        if let Some(interval) = obj
            .get("statistics_reporting_interval")
            .and_then(Value::as_u64)
        {
            self.statistics.set_interval(Duration::from_secs(interval));
        }
        Ok(())
    }

    /// Route each wire rule to its slot and return the parsed set.
    fn apply_rules(&mut self, rules: &Value) -> Result<Vec<WireRule>, FirewallError> {
        let Some(array) = rules.as_array() else {
            return Err(FirewallError::BadRequest(
                "'rules' must be an array".to_string(),
            ));
        };
        if array.len() > self.limits.max_wire_rules {
            return Err(FirewallError::BadRequest(format!(
                "rules array exceeds limit of {}",
                self.limits.max_wire_rules
            )));
        }

        let mut applied = Vec::with_capacity(array.len());
        for rule in array {
            let mut wire: WireRule = serde_json::from_value(rule.clone())
                .map_err(|e| FirewallError::BadRequest(format!("malformed rule: {e}")))?;
            let (sense, entry) = wire_to_native(&wire);
            let id = self.engine.insert_rule(sense, wire.id, entry)?;
            debug!(%sense, id, "rule installed");
            // Record the assigned slot so a persisted copy of this
            // rule reoccupies it instead of appending a duplicate.
            wire.id = Some(id);
            applied.push(wire);
        }
        Ok(applied)
    }

    fn parse_domains(&self, domains: &Value) -> Result<Vec<String>, FirewallError> {
        let Some(array) = domains.as_array() else {
            return Err(FirewallError::BadRequest(
                "'domains' must be an array of strings".to_string(),
            ));
        };
        if array.len() > self.limits.max_wire_domains {
            return Err(FirewallError::BadRequest(format!(
                "domains array exceeds limit of {}",
                self.limits.max_wire_domains
            )));
        }
        array
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    FirewallError::BadRequest("'domains' must be an array of strings".to_string())
                })
            })
            .collect()
    }

    fn apply_domains(&mut self, domains: &Value) -> Result<(), FirewallError> {
        let parsed = self.parse_domains(domains)?;
        self.engine.set_domains(parsed)
    }

    // ── Get helpers ───────────────────────────────────────────────

    fn configuration_fields(&self) -> Value {
        json!({
            "enable": self.enabled,
            "suspend": self.suspended,
            "default_policy": {
                "default_policy_inbound": self.default_policy.inbound.as_str(),
                "default_policy_outbound": self.default_policy.outbound.as_str(),
            },
            "default_domains": self.default_domains,
            "alert_enabled": self.alerts.is_enabled(),
            "alert_threshold_inbound": self.alerts.threshold(Sense::Inbound),
            "alert_threshold_outbound": self.alerts.threshold(Sense::Outbound),
            "statistics_reporting_interval": self.statistics.interval().as_secs(),
        })
    }

    /// Rules as currently installed, both directions, ascending ids.
    fn enumerate_rules(&self) -> Result<Vec<WireRule>, FirewallError> {
        let mut rules = Vec::new();
        for sense in Sense::ALL {
            for (id, entry) in self.engine.get_rules(sense)? {
                rules.push(native_to_wire(id, sense, &entry));
            }
        }
        Ok(rules)
    }

    // ── Persistence ───────────────────────────────────────────────

    fn persist(&mut self) -> Result<(), FirewallError> {
        if self.save_suppressed {
            return Ok(());
        }
        let document = json!({
            "firewall": {
                "configuration": self.configuration_fields(),
                "rules": self.enumerate_rules()?,
                "default_rules": self.default_rules,
                "domains": self.engine.get_domains()?,
            }
        });
        self.store.save(&document)
    }

    /// Apply boot-time defaults through the `set` path without
    /// persisting them, so they never clobber saved state that a
    /// following `restore` would reapply.
    pub fn apply_boot_defaults(&mut self, fields: Value) -> Result<(), FirewallError> {
        let mut envelope = Envelope::new(KIND_FIREWALL, "set", fields);
        self.save_suppressed = true;
        let result = self.handle(&mut envelope);
        self.save_suppressed = false;
        result
    }

    /// Replay the persisted configuration through the live `set` path.
    /// Best-effort: any failure leaves the controller on defaults.
    pub fn restore(&mut self) {
        let document = match self.store.restore() {
            Ok(document) => document,
            Err(FirewallError::NotFound) => {
                debug!("no persisted configuration, starting from defaults");
                return;
            }
            Err(e) => {
                warn!(error = %e, "configuration restore failed, using defaults");
                return;
            }
        };

        let mut envelope = Envelope::new(KIND_FIREWALL, "set", document);
        self.save_suppressed = true;
        let result = self.handle(&mut envelope);
        self.save_suppressed = false;
        match result {
            Ok(()) => info!("persisted configuration restored"),
            Err(e) => warn!(error = %e, "restored configuration rejected, using defaults"),
        }
    }

    // ── Cooperative tick ──────────────────────────────────────────

    fn wall_clock() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Drive alert delivery and interval statistics. Never fails:
    /// report-path errors are logged and retried next tick.
    pub fn tick(&mut self, now: Instant) {
        let time = Self::wall_clock();
        self.alerts.tick(self.outbound.as_ref(), time);

        if self.statistics.due(now) {
            match self.engine.get_statistics() {
                Ok(snapshot) => {
                    let report = self.statistics.report(snapshot, time, now);
                    if let Err(e) = self.outbound.publish(&report) {
                        warn!(error = %e, "statistics delivery failed");
                    }
                }
                Err(e) => debug!(error = %e, "statistics snapshot unavailable"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::filter::stub::StubPacketFilter;
    use adapters::storage::file_config_store::FileConfigStore;
    use domain::common::entity::Protocol;
    use domain::firewall::alert::{DecisionEndpoint, PacketDecision};
    use domain::message::entity::KIND_STATISTICS;
    use ports::test_utils::NoopOutbound;

    fn make_controller(dir: &tempfile::TempDir) -> FirewallController {
        FirewallController::new(
            Box::new(StubPacketFilter::new(32)),
            Box::new(FileConfigStore::new(dir.path(), 16 * 1024)),
            Box::new(NoopOutbound),
            AlertPipeline::new(256),
            Duration::from_secs(300),
            ControllerLimits::default(),
        )
    }

    fn set_envelope(fields: Value) -> Envelope {
        Envelope::new(KIND_FIREWALL, "set", fields)
    }

    #[test]
    fn set_then_get_shows_enabled_and_one_rule() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = make_controller(&dir);

        let mut set = set_envelope(json!({
            "firewall": {
                "configuration": {"enable": true},
                "rules": [{"sense": "outbound", "action": "drop", "protocol": "tcp"}]
            }
        }));
        controller.handle(&mut set).unwrap();
        assert_eq!(set.fields["status"], "success");
        assert!(controller.is_enabled());

        let mut get = Envelope::new(KIND_FIREWALL, "get", json!({"rules": {}}));
        controller.handle(&mut get).unwrap();
        let rules = get.fields["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0]["sense"], "outbound");
        assert_eq!(rules[0]["action"], "drop");
        assert_eq!(rules[0]["protocol"], "tcp");
        assert_eq!(rules[0]["id"], 0);
    }

    #[test]
    fn get_mirrors_nested_request_shape() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = make_controller(&dir);

        let mut get = Envelope::new(
            KIND_FIREWALL,
            "get",
            json!({"firewall": {"configuration": {}, "domains": {}}}),
        );
        controller.handle(&mut get).unwrap();
        let doc = &get.fields["firewall"];
        assert_eq!(doc["configuration"]["enable"], false);
        assert!(doc["domains"].as_array().unwrap().is_empty());
    }

    #[test]
    fn delete_removes_exactly_the_named_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = make_controller(&dir);

        let mut set = set_envelope(json!({
            "firewall": {
                "rules": [
                    {"action": "drop", "protocol": "tcp"},
                    {"action": "drop", "protocol": "udp"},
                    {"action": "drop", "protocol": "icmp"}
                ]
            }
        }));
        controller.handle(&mut set).unwrap();

        let mut delete = Envelope::new(
            KIND_FIREWALL,
            "delete",
            json!({"firewall": {"rules": [{"id": 1}]}}),
        );
        controller.handle(&mut delete).unwrap();

        let mut get = Envelope::new(KIND_FIREWALL, "get", json!({"rules": {}}));
        controller.handle(&mut get).unwrap();
        let ids: Vec<u64> = get.fields["rules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn wrong_kind_and_update_are_bad_requests() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = make_controller(&dir);

        let mut wrong = Envelope::new("ts.event.location", "get", json!({}));
        assert!(matches!(
            controller.handle(&mut wrong),
            Err(FirewallError::BadRequest(_))
        ));

        let mut update = Envelope::new(KIND_FIREWALL, "update", json!({"firewall": {}}));
        assert!(matches!(
            controller.handle(&mut update),
            Err(FirewallError::BadRequest(_))
        ));
    }

    #[test]
    fn capacity_error_leaves_existing_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = FirewallController::new(
            Box::new(StubPacketFilter::new(2)),
            Box::new(FileConfigStore::new(dir.path(), 16 * 1024)),
            Box::new(NoopOutbound),
            AlertPipeline::new(256),
            Duration::from_secs(300),
            ControllerLimits::default(),
        );

        let mut set = set_envelope(json!({
            "firewall": {
                "rules": [
                    {"action": "drop", "protocol": "tcp"},
                    {"action": "drop", "protocol": "udp"},
                    {"action": "drop", "protocol": "icmp"}
                ]
            }
        }));
        assert!(matches!(
            controller.handle(&mut set),
            Err(FirewallError::CapacityExceeded { .. })
        ));

        let mut get = Envelope::new(KIND_FIREWALL, "get", json!({"rules": {}}));
        controller.handle(&mut get).unwrap();
        assert_eq!(get.fields["rules"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn configuration_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut controller = make_controller(&dir);
            let mut set = set_envelope(json!({
                "firewall": {
                    "configuration": {
                        "enable": true,
                        "alert_enabled": true,
                        "alert_threshold_inbound": 4
                    },
                    "rules": [{"sense": "inbound", "action": "drop", "protocol": "udp"}],
                    "domains": ["blocked.example.com"]
                }
            }));
            controller.handle(&mut set).unwrap();
        }

        let mut controller = make_controller(&dir);
        controller.restore();
        assert!(controller.is_enabled());

        let mut get = Envelope::new(
            KIND_FIREWALL,
            "get",
            json!({"configuration": {}, "rules": {}, "domains": {}}),
        );
        controller.handle(&mut get).unwrap();
        assert_eq!(get.fields["configuration"]["alert_threshold_inbound"], 4);
        assert_eq!(get.fields["rules"].as_array().unwrap().len(), 1);
        assert_eq!(get.fields["domains"][0], "blocked.example.com");
    }

    #[test]
    fn restore_does_not_duplicate_default_rules() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut controller = make_controller(&dir);
            let mut set = set_envelope(json!({
                "firewall": {
                    "default_rules": [
                        {"sense": "inbound", "action": "drop", "protocol": "icmp"}
                    ]
                }
            }));
            controller.handle(&mut set).unwrap();
        }

        for _ in 0..3 {
            let mut controller = make_controller(&dir);
            controller.restore();

            let mut get = Envelope::new(
                KIND_FIREWALL,
                "get",
                json!({"rules": {}, "default_rules": {}}),
            );
            controller.handle(&mut get).unwrap();
            assert_eq!(get.fields["rules"].as_array().unwrap().len(), 1);
            let default_rules = get.fields["default_rules"].as_array().unwrap();
            assert_eq!(default_rules.len(), 1);
            assert_eq!(default_rules[0]["id"], 0);
        }
    }

    #[test]
    fn restore_with_foreign_version_leaves_defaults() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut controller = make_controller(&dir);
            let mut set = set_envelope(json!({
                "firewall": {"configuration": {"enable": true}}
            }));
            controller.handle(&mut set).unwrap();
        }
        std::fs::write(dir.path().join("version"), b"edgewall-fw-9").unwrap();

        let mut controller = make_controller(&dir);
        controller.restore();
        assert!(!controller.is_enabled());

        let mut get = Envelope::new(KIND_FIREWALL, "get", json!({"rules": {}}));
        controller.handle(&mut get).unwrap();
        assert!(get.fields["rules"].as_array().unwrap().is_empty());
    }

    #[test]
    fn restore_without_saved_state_is_clean_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = make_controller(&dir);
        controller.restore();
        assert!(!controller.is_enabled());
    }

    #[test]
    fn restore_does_not_rewrite_the_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut controller = make_controller(&dir);
            let mut set = set_envelope(json!({
                "firewall": {"configuration": {"enable": true}}
            }));
            controller.handle(&mut set).unwrap();
        }
        let rules_path = dir.path().join("rules");
        let before = std::fs::metadata(&rules_path).unwrap().modified().unwrap();

        let mut controller = make_controller(&dir);
        controller.restore();
        let after = std::fs::metadata(&rules_path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn suspend_lifts_enforcement_and_resume_restores_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = make_controller(&dir);
        let mut set = set_envelope(json!({
            "firewall": {"configuration": {"enable": true}}
        }));
        controller.handle(&mut set).unwrap();
        assert_eq!(controller.bridge.last_pushed(), Some(true));

        controller.suspend().unwrap();
        assert!(controller.is_enabled());
        assert_eq!(controller.bridge.last_pushed(), Some(false));

        controller.resume().unwrap();
        assert_eq!(controller.bridge.last_pushed(), Some(true));
    }

    #[test]
    fn tick_reports_statistics_when_due() {
        use ports::test_utils::RecordingOutbound;
        use std::sync::Arc;

        struct SharedOutbound(Arc<RecordingOutbound>);
        impl OutboundPort for SharedOutbound {
            fn publish(&self, envelope: &Envelope) -> Result<(), FirewallError> {
                self.0.publish(envelope)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(RecordingOutbound::new());
        let mut engine = StubPacketFilter::new(32);
        engine.initialize().unwrap();
        engine.inject_decision(PacketDecision {
            sense: Sense::Inbound,
            action: Action::Drop,
            protocol: Protocol::Tcp,
            interface: 1,
            source: DecisionEndpoint::default(),
            destination: DecisionEndpoint::default(),
        });

        let mut controller = FirewallController::new(
            Box::new(engine),
            Box::new(FileConfigStore::new(dir.path(), 16 * 1024)),
            Box::new(SharedOutbound(Arc::clone(&recorder))),
            AlertPipeline::new(256),
            Duration::from_secs(0),
            ControllerLimits::default(),
        );
        controller.tick(Instant::now());

        let published = recorder.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].kind, KIND_STATISTICS);
        assert_eq!(published[0].fields["inbound"], 1);
        assert_eq!(published[0].fields["inbound_blocked"], 1);
    }

    #[test]
    fn oversized_rule_arrays_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = FirewallController::new(
            Box::new(StubPacketFilter::new(32)),
            Box::new(FileConfigStore::new(dir.path(), 16 * 1024)),
            Box::new(NoopOutbound),
            AlertPipeline::new(256),
            Duration::from_secs(300),
            ControllerLimits {
                max_wire_rules: 2,
                max_wire_domains: 16,
            },
        );

        let mut set = set_envelope(json!({
            "firewall": {
                "rules": [
                    {"protocol": "tcp"}, {"protocol": "udp"}, {"protocol": "icmp"}
                ]
            }
        }));
        assert!(matches!(
            controller.handle(&mut set),
            Err(FirewallError::BadRequest(_))
        ));
    }
}
