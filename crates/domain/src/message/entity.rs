//! The JSON message envelope exchanged with the management server.

use serde::{Deserialize, Serialize};

use crate::firewall::error::FirewallError;

pub const KIND_FIREWALL: &str = "ts.event.firewall";
pub const KIND_ALERT: &str = "ts.event.firewall.alert";
pub const KIND_STATISTICS: &str = "ts.event.firewall.statistics";

/// Request verb carried in the envelope `action` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageAction {
    Set,
    Update,
    Get,
    Delete,
}

impl MessageAction {
    pub fn parse(s: &str) -> Result<Self, FirewallError> {
        match s {
            "set" => Ok(Self::Set),
            "update" => Ok(Self::Update),
            "get" => Ok(Self::Get),
            "delete" => Ok(Self::Delete),
            other => Err(FirewallError::BadRequest(format!(
                "unknown action '{other}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Update => "update",
            Self::Get => "get",
            Self::Delete => "delete",
        }
    }
}

/// A management message. Requests are mutated in place into replies,
/// so the same shape serves both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactionid: Option<String>,
    pub kind: String,
    pub action: String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

impl Envelope {
    pub fn new(kind: &str, action: &str, fields: serde_json::Value) -> Self {
        Self {
            transactionid: None,
            kind: kind.to_string(),
            action: action.to_string(),
            fields,
        }
    }
}
