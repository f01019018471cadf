#![forbid(unsafe_code)]

pub mod filter;
pub mod outbound;
pub mod storage;
