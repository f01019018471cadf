#![forbid(unsafe_code)]

pub mod codec;
pub mod common;
pub mod firewall;
pub mod message;
