//! Terminal shell: event source, view rendering, input widgets.

pub mod event_source;
pub mod message_input;
pub mod shell;
pub mod styles;
pub mod terminal;
pub mod view;

/// Returns the ui module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
