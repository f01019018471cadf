use serde::{Deserialize, Serialize};

/// Traffic direction relative to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    #[default]
    Inbound,
    Outbound,
}

impl Sense {
    /// Both directions, in the order they appear in reports.
    pub const ALL: [Self; 2] = [Self::Inbound, Self::Outbound];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    /// Array index for per-direction state (counters, thresholds, pools).
    pub fn index(self) -> usize {
        match self {
            Self::Inbound => 0,
            Self::Outbound => 1,
        }
    }

    /// Parse a wire sense string. Unknown or absent values default to inbound.
    pub fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some("outbound") => Self::Outbound,
            _ => Self::Inbound,
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict applied to a matching packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Accept,
    Drop,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Drop => "drop",
        }
    }

    /// Parse a wire action string. Anything other than `"drop"` accepts.
    pub fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some("drop") => Self::Drop,
            _ => Self::Accept,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Icmp,
    Unknown,
}

impl Protocol {
    /// IP protocol number as used by the filter engine. Unknown maps to 0.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Tcp => 6,
            Self::Udp => 17,
            Self::Icmp => 1,
            Self::Unknown => 0,
        }
    }

    pub fn from_u8(n: u8) -> Self {
        match n {
            6 => Self::Tcp,
            17 => Self::Udp,
            1 => Self::Icmp,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Icmp => "icmp",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire protocol string. Unrecognised names map to Unknown.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "tcp" => Self::Tcp,
            "udp" => Self::Udp,
            "icmp" => Self::Icmp,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sense_from_wire() {
        assert_eq!(Sense::from_wire(Some("outbound")), Sense::Outbound);
        assert_eq!(Sense::from_wire(Some("inbound")), Sense::Inbound);
        assert_eq!(Sense::from_wire(Some("sideways")), Sense::Inbound);
        assert_eq!(Sense::from_wire(None), Sense::Inbound);
    }

    #[test]
    fn sense_index_is_stable() {
        assert_eq!(Sense::Inbound.index(), 0);
        assert_eq!(Sense::Outbound.index(), 1);
        assert_eq!(Sense::ALL[0], Sense::Inbound);
        assert_eq!(Sense::ALL[1], Sense::Outbound);
    }

    #[test]
    fn action_defaults_to_accept() {
        assert_eq!(Action::from_wire(None), Action::Accept);
        assert_eq!(Action::from_wire(Some("accept")), Action::Accept);
        assert_eq!(Action::from_wire(Some("reject")), Action::Accept);
        assert_eq!(Action::from_wire(Some("drop")), Action::Drop);
    }

    #[test]
    fn protocol_roundtrip() {
        for proto in [Protocol::Tcp, Protocol::Udp, Protocol::Icmp] {
            assert_eq!(Protocol::from_u8(proto.to_u8()), proto);
        }
    }

    #[test]
    fn protocol_known_numbers() {
        assert_eq!(Protocol::Tcp.to_u8(), 6);
        assert_eq!(Protocol::Udp.to_u8(), 17);
        assert_eq!(Protocol::Icmp.to_u8(), 1);
    }

    #[test]
    fn protocol_unknown_name() {
        assert_eq!(Protocol::from_wire("gre"), Protocol::Unknown);
        assert_eq!(Protocol::from_wire("tcp"), Protocol::Tcp);
    }
}
