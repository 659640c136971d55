use anyhow::Result;

use crate::domain::{events::AppEvent, shell_state::ShellState};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Control surface of the cancellable polling loop.
///
/// At most one loop runs at any instant; `restart` must stop the previous
/// loop before the new one starts. The generation number tags every result
/// the loop emits so late arrivals from a superseded loop identify
/// themselves and are dropped.
pub trait PollDriver {
    fn restart(&mut self, chat_id: i64, generation: u64);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}
