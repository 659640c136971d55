use std::sync::mpsc::Receiver;

use anyhow::Result;

use crate::{
    api::presence::{PresenceHandle, PresenceSignal},
    domain::events::AppEvent,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
    },
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    background_rx: &Receiver<AppEvent>,
    presence: &PresenceHandle,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        server = %context.config.server.base_url,
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;

    while orchestrator.state().is_running() {
        terminal.draw(|frame| view::render(frame, orchestrator.state()))?;

        if let Some(event) = event_source.next_event()? {
            match &event {
                AppEvent::InputKey(_) | AppEvent::PasteImage(_) => {
                    presence.touch(PresenceSignal::Activity)
                }
                AppEvent::FocusRegained => presence.touch(PresenceSignal::Focus),
                _ => {}
            }
            orchestrator.handle_event(event)?;
        }

        // Background results (poll snapshots) interleave between input
        // events; they are applied on the same thread, never concurrently.
        while let Ok(event) = background_rx.try_recv() {
            orchestrator.handle_event(event)?;
        }
    }

    Ok(())
}
