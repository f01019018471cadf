use thiserror::Error;

use crate::common::entity::Sense;

#[derive(Debug, Error)]
pub enum FirewallError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("rule pool full for {sense} traffic")]
    CapacityExceeded { sense: Sense },

    #[error("not found")]
    NotFound,

    #[error("persisted format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error("filter engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("persisted document too large: {size} bytes (limit {max})")]
    OversizedConfig { size: usize, max: usize },
}

impl From<std::io::Error> for FirewallError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FirewallError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
