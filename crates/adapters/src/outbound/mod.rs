pub mod log_publisher;
