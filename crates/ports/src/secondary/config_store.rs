//! Durable storage for the firewall configuration document.

use domain::firewall::error::FirewallError;

/// Persists one JSON configuration document across restarts.
///
/// `restore` distinguishes "nothing saved yet" (`NotFound`) from a
/// document written by an incompatible release (`VersionMismatch`);
/// callers treat the former as a clean first boot.
pub trait ConfigStorePort: Send {
    fn save(&self, document: &serde_json::Value) -> Result<(), FirewallError>;
    fn restore(&self) -> Result<serde_json::Value, FirewallError>;
}
