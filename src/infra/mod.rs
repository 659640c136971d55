//! Infrastructure layer: configuration, logging, durable storage.

pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod opener;
pub mod session_vault;
pub mod storage_layout;
pub mod stubs;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
