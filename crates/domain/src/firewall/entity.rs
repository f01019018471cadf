//! Native and wire rule representations.
//!
//! A native rule entry is the compact form handed to the packet filter
//! engine: numeric fields plus a bitset saying which of them take part
//! in matching. A clear bit means "wildcard", so a zero value with the
//! bit set still matches exactly. The wire form mirrors the JSON rule
//! objects exchanged with the management server.

use serde::{Deserialize, Serialize};

use crate::codec::PortValue;
use crate::common::entity::Action;

// ── Match flag bits ───────────────────────────────────────────────

pub const MATCH_PROTOCOL: u16 = 1 << 0;
pub const MATCH_DOMAIN: u16 = 1 << 1;
pub const MATCH_SRC_MAC: u16 = 1 << 2;
pub const MATCH_SRC_ADDRESS: u16 = 1 << 3;
pub const MATCH_SRC_NETMASK: u16 = 1 << 4;
pub const MATCH_SRC_PORT: u16 = 1 << 5;
pub const MATCH_DST_MAC: u16 = 1 << 6;
pub const MATCH_DST_ADDRESS: u16 = 1 << 7;
pub const MATCH_DST_NETMASK: u16 = 1 << 8;
pub const MATCH_DST_PORT: u16 = 1 << 9;

pub const MATCH_SRC_ANY: u16 = MATCH_SRC_MAC | MATCH_SRC_ADDRESS | MATCH_SRC_NETMASK | MATCH_SRC_PORT;
pub const MATCH_DST_ANY: u16 = MATCH_DST_MAC | MATCH_DST_ADDRESS | MATCH_DST_NETMASK | MATCH_DST_PORT;

// ── Interface codes ───────────────────────────────────────────────

/// Engine code meaning "match any interface".
pub const INTERFACE_ANY: u8 = 0;
/// Engine code for an interface name the device does not know.
/// Rules carrying it never match, which is safer than silently
/// widening them to all interfaces.
pub const INTERFACE_NO_MATCH: u8 = 255;

const INTERFACE_TABLE: [(&str, u8); 4] = [("eth0", 1), ("wlan0", 2), ("ppp0", 3), ("usb0", 4)];

/// Map a wire interface name to its engine code. The empty string
/// means any interface; unknown names map to the no-match code.
pub fn interface_code(name: &str) -> u8 {
    if name.is_empty() {
        return INTERFACE_ANY;
    }
    INTERFACE_TABLE
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(INTERFACE_NO_MATCH, |(_, code)| *code)
}

/// Map an engine interface code back to its wire name.
pub fn interface_name(code: u8) -> &'static str {
    INTERFACE_TABLE
        .iter()
        .find(|(_, c)| *c == code)
        .map_or("", |(n, _)| *n)
}

// ── Native form ───────────────────────────────────────────────────

/// One side (source or destination) of a native rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub mac: [u8; 6],
    /// IPv4 address in host byte order.
    pub address: u32,
    pub netmask: u32,
    pub port: u16,
}

/// A rule in the form the packet filter engine consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeRuleEntry {
    /// Bitset of `MATCH_*` constants; a clear bit wildcards the field.
    pub match_flags: u16,
    pub action: Action,
    /// IP protocol number; meaningful only with `MATCH_PROTOCOL` set.
    pub protocol: u8,
    /// Interface code; `INTERFACE_ANY` matches every interface.
    pub interface: u8,
    /// True when the rule matches DNS-resolved domain traffic.
    pub domain: bool,
    pub source: Endpoint,
    pub destination: Endpoint,
}

impl NativeRuleEntry {
    pub fn matches_protocol(&self) -> bool {
        self.match_flags & MATCH_PROTOCOL != 0
    }

    pub fn matches_source(&self) -> bool {
        self.match_flags & MATCH_SRC_ANY != 0
    }

    pub fn matches_destination(&self) -> bool {
        self.match_flags & MATCH_DST_ANY != 0
    }
}

/// Per-direction verdict applied when no rule matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPolicy {
    pub inbound: Action,
    pub outbound: Action,
}

// ── Wire form ─────────────────────────────────────────────────────

/// One side of a wire rule. All fields are optional; absent, empty,
/// and zero values alike mean the field does not participate in
/// matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireEndpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<PortValue>,
}

/// A rule as it appears in management server JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u16>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sense: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<WireEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<WireEndpoint>,
}
