use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Default)]
pub struct CrosstermEventSource;

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            Event::FocusGained => Ok(Some(AppEvent::FocusRegained)),
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return Ok(None);
                }

                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

                if key.code == KeyCode::Char('c') && ctrl {
                    return Ok(Some(AppEvent::QuitRequested));
                }

                // Paste-to-send: a file path on the clipboard becomes an
                // image message.
                if key.code == KeyCode::Char('v') && ctrl {
                    return Ok(clipboard_paste_event());
                }

                Ok(key_name(key.code).map(|name| AppEvent::InputKey(KeyInput::new(name, ctrl))))
            }
            _ => Ok(None),
        }
    }
}

fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Enter => Some("enter".to_owned()),
        KeyCode::Esc => Some("esc".to_owned()),
        KeyCode::Backspace => Some("backspace".to_owned()),
        KeyCode::Tab => Some("tab".to_owned()),
        KeyCode::Up => Some("up".to_owned()),
        KeyCode::Down => Some("down".to_owned()),
        KeyCode::Left => Some("left".to_owned()),
        KeyCode::Right => Some("right".to_owned()),
        KeyCode::Char(ch) => Some(ch.to_string()),
        _ => None,
    }
}

fn clipboard_paste_event() -> Option<AppEvent> {
    let mut clipboard = arboard::Clipboard::new().ok()?;
    let text = clipboard.get_text().ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(AppEvent::PasteImage(trimmed.to_owned()))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_cover_navigation_and_editing_keys() {
        assert_eq!(key_name(KeyCode::Enter).as_deref(), Some("enter"));
        assert_eq!(key_name(KeyCode::Backspace).as_deref(), Some("backspace"));
        assert_eq!(key_name(KeyCode::Char('j')).as_deref(), Some("j"));
        assert_eq!(key_name(KeyCode::F(5)), None);
    }
}
