//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod controller;
pub mod create_chat;
pub mod delete_chat;
pub mod list_chats;
pub mod load_chat;
pub mod logout;
pub mod send_image;
pub mod send_message;
pub mod session_store;
pub mod startup;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
