pub mod config_store;
pub mod outbound;
pub mod packet_filter;
