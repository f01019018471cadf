#![forbid(unsafe_code)]

pub mod alert_pipeline;
pub mod controller;
pub mod engine_bridge;
pub mod statistics;
