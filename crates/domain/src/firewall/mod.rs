pub mod alert;
pub mod entity;
pub mod error;
pub mod stats;
pub mod table;
pub mod translate;
