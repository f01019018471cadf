//! Interval statistics reporting.
//!
//! Keeps the last-reported engine snapshot as a baseline and emits
//! per-interval deltas as flat integer fields, the shape the
//! management server ingests.

use std::time::{Duration, Instant};

use serde_json::json;

use domain::firewall::stats::{DirectionCounters, StatisticsSnapshot};
use domain::message::entity::{Envelope, KIND_STATISTICS};

pub struct StatisticsReporter {
    baseline: StatisticsSnapshot,
    interval: Duration,
    last_report: Instant,
}

impl StatisticsReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            baseline: StatisticsSnapshot::default(),
            interval,
            last_report: Instant::now(),
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn due(&self, now: Instant) -> bool {
        now.duration_since(self.last_report) >= self.interval
    }

    /// Build a statistics report from the current engine snapshot and
    /// advance the baseline to it.
    pub fn report(&mut self, current: StatisticsSnapshot, time: u64, now: Instant) -> Envelope {
        let delta = current.delta_since(&self.baseline);
        self.baseline = current;
        self.last_report = now;

        let fields = json!({
            "inbound": delta.inbound.total,
            "inbound_tcp": delta.inbound.tcp,
            "inbound_udp": delta.inbound.udp,
            "inbound_icmp": delta.inbound.icmp,
            "inbound_blocked": delta.inbound.dropped,
            "inbound_blocked_tcp": delta.inbound.dropped_tcp,
            "inbound_blocked_udp": delta.inbound.dropped_udp,
            "inbound_blocked_icmp": delta.inbound.dropped_icmp,
            "outbound": delta.outbound.total,
            "outbound_tcp": delta.outbound.tcp,
            "outbound_udp": delta.outbound.udp,
            "outbound_icmp": delta.outbound.icmp,
            "outbound_blocked": delta.outbound.dropped,
            "outbound_blocked_tcp": delta.outbound.dropped_tcp,
            "outbound_blocked_udp": delta.outbound.dropped_udp,
            "outbound_blocked_icmp": delta.outbound.dropped_icmp,
            "time": time,
        });
        Envelope::new(KIND_STATISTICS, "set", fields)
    }

    /// Raw cumulative counters as flat fields, for `get` requests.
    pub fn snapshot_fields(snapshot: &StatisticsSnapshot) -> serde_json::Value {
        fn direction(prefix: &str, c: &DirectionCounters) -> Vec<(String, serde_json::Value)> {
            vec![
                (prefix.to_string(), json!(c.total)),
                (format!("{prefix}_tcp"), json!(c.tcp)),
                (format!("{prefix}_udp"), json!(c.udp)),
                (format!("{prefix}_icmp"), json!(c.icmp)),
                (format!("{prefix}_blocked"), json!(c.dropped)),
                (format!("{prefix}_blocked_tcp"), json!(c.dropped_tcp)),
                (format!("{prefix}_blocked_udp"), json!(c.dropped_udp)),
                (format!("{prefix}_blocked_icmp"), json!(c.dropped_icmp)),
            ]
        }
        let mut map = serde_json::Map::new();
        for (key, value) in direction("inbound", &snapshot.inbound)
            .into_iter()
            .chain(direction("outbound", &snapshot.outbound))
        {
            map.insert(key, value);
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(inbound_total: u64) -> StatisticsSnapshot {
        StatisticsSnapshot {
            inbound: DirectionCounters {
                total: inbound_total,
                tcp: inbound_total,
                ..DirectionCounters::default()
            },
            outbound: DirectionCounters::default(),
        }
    }

    #[test]
    fn report_emits_delta_and_advances_baseline() {
        let mut reporter = StatisticsReporter::new(Duration::from_secs(300));
        let now = Instant::now();

        let first = reporter.report(snapshot(10), 1000, now);
        assert_eq!(first.fields["inbound"], 10);

        let second = reporter.report(snapshot(15), 1300, now);
        assert_eq!(second.kind, KIND_STATISTICS);
        assert_eq!(second.fields["inbound"], 5);
        assert_eq!(second.fields["inbound_tcp"], 5);
        assert_eq!(second.fields["time"], 1300);

        // Same snapshot again: nothing new since the baseline moved.
        let third = reporter.report(snapshot(15), 1600, now);
        assert_eq!(third.fields["inbound"], 0);
    }

    #[test]
    fn due_respects_interval() {
        let mut reporter = StatisticsReporter::new(Duration::from_secs(300));
        let start = Instant::now();
        reporter.report(snapshot(0), 0, start);

        assert!(!reporter.due(start + Duration::from_secs(299)));
        assert!(reporter.due(start + Duration::from_secs(300)));
    }

    #[test]
    fn snapshot_fields_are_flat_integers() {
        let fields = StatisticsReporter::snapshot_fields(&snapshot(7));
        assert_eq!(fields["inbound"], 7);
        assert_eq!(fields["inbound_tcp"], 7);
        assert_eq!(fields["outbound_blocked"], 0);
        assert!(fields.get("time").is_none());
    }
}
