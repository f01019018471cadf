//! Pure string ⇄ native conversions for addresses, MACs, and port values.
//!
//! Wire documents carry addresses as dotted-quad strings, MACs as
//! colon-separated hex, and ports as string, integer, or float. The
//! translator treats empty or zero values as "field absent", so every
//! parser here returns `None` rather than an error for such input.

use serde::{Deserialize, Serialize};

/// Format an IPv4 address (host byte order) as a dotted quad.
pub fn format_ipv4(addr: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (addr >> 24) & 0xFF,
        (addr >> 16) & 0xFF,
        (addr >> 8) & 0xFF,
        addr & 0xFF
    )
}

/// Parse a dotted-quad IPv4 address into host byte order.
/// Empty strings and malformed input yield `None`.
pub fn parse_ipv4(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut octets = s.split('.');
    let mut addr: u32 = 0;
    for shift in [24u32, 16, 8, 0] {
        let octet = octets.next()?.parse::<u8>().ok()?;
        addr |= u32::from(octet) << shift;
    }
    if octets.next().is_some() {
        return None;
    }
    Some(addr)
}

/// Format a MAC address as lowercase colon-separated hex.
pub fn format_mac(mac: [u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

/// Parse a colon-separated MAC address. Accepts upper or lower case hex.
/// Empty strings and malformed input yield `None`.
pub fn parse_mac(s: &str) -> Option<[u8; 6]> {
    if s.is_empty() {
        return None;
    }
    let mut mac = [0u8; 6];
    let mut parts = s.split(':');
    for byte in &mut mac {
        let part = parts.next()?;
        if part.len() != 2 {
            return None;
        }
        *byte = u8::from_str_radix(part, 16).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(mac)
}

/// A wire port value, which management servers send in any of three
/// JSON representations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Int(u64),
    Float(f64),
    Str(String),
}

impl PortValue {
    /// Normalize to a 16-bit port. Zero, empty, and unparsable values
    /// all mean "no port specified".
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn normalize(&self) -> Option<u16> {
        let port = match self {
            Self::Int(n) => *n as u16,
            Self::Float(f) => *f as u16,
            Self::Str(s) => s.trim().parse::<u16>().unwrap_or(0),
        };
        (port != 0).then_some(port)
    }
}

impl From<u16> for PortValue {
    fn from(port: u16) -> Self {
        Self::Int(u64::from(port))
    }
}
