//! Traffic counters and interval deltas.
//!
//! The filter engine exposes cumulative counters. Reports carry the
//! change since the previous report, so a baseline snapshot is kept
//! and subtracted. If the engine restarts its counters fall below the
//! baseline; in that case the raw current value is reported, which
//! undercounts at most one interval instead of wrapping.

use serde::{Deserialize, Serialize};

/// Cumulative counters for one traffic direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionCounters {
    pub total: u64,
    pub tcp: u64,
    pub udp: u64,
    pub icmp: u64,
    pub dropped: u64,
    pub dropped_tcp: u64,
    pub dropped_udp: u64,
    pub dropped_icmp: u64,
}

impl DirectionCounters {
    fn delta_field(current: u64, baseline: u64) -> u64 {
        if current < baseline {
            current
        } else {
            current - baseline
        }
    }

    pub fn delta_since(&self, baseline: &Self) -> Self {
        Self {
            total: Self::delta_field(self.total, baseline.total),
            tcp: Self::delta_field(self.tcp, baseline.tcp),
            udp: Self::delta_field(self.udp, baseline.udp),
            icmp: Self::delta_field(self.icmp, baseline.icmp),
            dropped: Self::delta_field(self.dropped, baseline.dropped),
            dropped_tcp: Self::delta_field(self.dropped_tcp, baseline.dropped_tcp),
            dropped_udp: Self::delta_field(self.dropped_udp, baseline.dropped_udp),
            dropped_icmp: Self::delta_field(self.dropped_icmp, baseline.dropped_icmp),
        }
    }
}

/// Counters for both directions at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub inbound: DirectionCounters,
    pub outbound: DirectionCounters,
}

impl StatisticsSnapshot {
    pub fn delta_since(&self, baseline: &Self) -> Self {
        Self {
            inbound: self.inbound.delta_since(&baseline.inbound),
            outbound: self.outbound.delta_since(&baseline.outbound),
        }
    }
}
