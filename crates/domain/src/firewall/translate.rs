//! Wire ⇄ native rule translation.
//!
//! Forward translation is lenient: absent, empty, and unparsable
//! fields simply stay wildcarded instead of failing the whole rule.
//! Reverse translation reconstructs a wire rule from the native entry
//! and synthesizes the `match` summary from the flag bits.

use crate::codec::{self, PortValue};
use crate::common::entity::{Action, Protocol, Sense};
use crate::firewall::entity::{
    Endpoint, NativeRuleEntry, WireEndpoint, WireRule, interface_code, interface_name,
    MATCH_DOMAIN, MATCH_DST_ADDRESS, MATCH_DST_ANY, MATCH_DST_MAC, MATCH_DST_NETMASK,
    MATCH_DST_PORT, MATCH_PROTOCOL, MATCH_SRC_ADDRESS, MATCH_SRC_ANY, MATCH_SRC_MAC,
    MATCH_SRC_NETMASK, MATCH_SRC_PORT,
};

struct EndpointFlags {
    mac: u16,
    address: u16,
    netmask: u16,
    port: u16,
}

const SRC_FLAGS: EndpointFlags = EndpointFlags {
    mac: MATCH_SRC_MAC,
    address: MATCH_SRC_ADDRESS,
    netmask: MATCH_SRC_NETMASK,
    port: MATCH_SRC_PORT,
};

const DST_FLAGS: EndpointFlags = EndpointFlags {
    mac: MATCH_DST_MAC,
    address: MATCH_DST_ADDRESS,
    netmask: MATCH_DST_NETMASK,
    port: MATCH_DST_PORT,
};

fn endpoint_to_native(wire: &WireEndpoint, flags: &EndpointFlags, bits: &mut u16) -> Endpoint {
    let mut native = Endpoint::default();
    if let Some(mac) = wire.mac.as_deref().and_then(codec::parse_mac) {
        native.mac = mac;
        *bits |= flags.mac;
    }
    if let Some(address) = wire.address.as_deref().and_then(codec::parse_ipv4) {
        native.address = address;
        *bits |= flags.address;
    }
    if let Some(netmask) = wire.netmask.as_deref().and_then(codec::parse_ipv4) {
        native.netmask = netmask;
        *bits |= flags.netmask;
    }
    if let Some(port) = wire.port.as_ref().and_then(PortValue::normalize) {
        native.port = port;
        *bits |= flags.port;
    }
    native
}

/// Translate a wire rule into the native engine form, also returning
/// the direction it applies to.
pub fn wire_to_native(rule: &WireRule) -> (Sense, NativeRuleEntry) {
    let sense = Sense::from_wire(rule.sense.as_deref());
    let mut entry = NativeRuleEntry {
        action: Action::from_wire(rule.action.as_deref()),
        // An absent protocol wildcards the match but still carries the
        // tcp code, the protocol's default.
        protocol: Protocol::default().to_u8(),
        ..NativeRuleEntry::default()
    };

    if let Some(protocol) = rule.protocol.as_deref() {
        entry.protocol = Protocol::from_wire(protocol).to_u8();
        entry.match_flags |= MATCH_PROTOCOL;
    }
    if rule.domain == Some(true) {
        entry.domain = true;
        entry.match_flags |= MATCH_DOMAIN;
    }
    entry.interface = interface_code(rule.interface.as_deref().unwrap_or(""));

    if let Some(source) = rule.source.as_ref() {
        entry.source = endpoint_to_native(source, &SRC_FLAGS, &mut entry.match_flags);
    }
    if let Some(destination) = rule.destination.as_ref() {
        entry.destination = endpoint_to_native(destination, &DST_FLAGS, &mut entry.match_flags);
    }

    (sense, entry)
}

fn endpoint_to_wire(native: &Endpoint, flags: &EndpointFlags, bits: u16) -> Option<WireEndpoint> {
    if bits & (flags.mac | flags.address | flags.netmask | flags.port) == 0 {
        return None;
    }
    Some(WireEndpoint {
        mac: (bits & flags.mac != 0).then(|| codec::format_mac(native.mac)),
        address: (bits & flags.address != 0).then(|| codec::format_ipv4(native.address)),
        netmask: (bits & flags.netmask != 0).then(|| codec::format_ipv4(native.netmask)),
        port: (bits & flags.port != 0).then(|| PortValue::from(native.port)),
    })
}

/// Summarize what the rule matches on. Field precedence mirrors the
/// order match criteria are usually authored in.
fn match_summary(entry: &NativeRuleEntry) -> &'static str {
    if entry.match_flags & MATCH_PROTOCOL != 0 {
        "protocol"
    } else if entry.match_flags & MATCH_SRC_ANY != 0 {
        "source"
    } else if entry.match_flags & MATCH_DST_ANY != 0 {
        "destination"
    } else if entry.match_flags & MATCH_DOMAIN != 0 {
        "domain"
    } else {
        "unknown"
    }
}

/// Translate a native entry back to the wire form, tagged with its id
/// and direction.
pub fn native_to_wire(id: u16, sense: Sense, entry: &NativeRuleEntry) -> WireRule {
    let bits = entry.match_flags;
    WireRule {
        id: Some(id),
        match_: Some(match_summary(entry).to_string()),
        sense: Some(sense.as_str().to_string()),
        action: Some(entry.action.as_str().to_string()),
        protocol: (bits & MATCH_PROTOCOL != 0)
            .then(|| Protocol::from_u8(entry.protocol).as_str().to_string()),
        interface: {
            let name = interface_name(entry.interface);
            (!name.is_empty()).then(|| name.to_string())
        },
        domain: (bits & MATCH_DOMAIN != 0).then_some(true),
        source: endpoint_to_wire(&entry.source, &SRC_FLAGS, bits),
        destination: endpoint_to_wire(&entry.destination, &DST_FLAGS, bits),
    }
}
