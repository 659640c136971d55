//! HTTP integration layer: wire DTOs, the reqwest client, and the background
//! polling and presence tasks.

pub mod blocking;
pub mod client;
pub mod dto;
pub mod poller;
pub mod presence;

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
