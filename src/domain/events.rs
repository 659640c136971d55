use super::{chat::ChatInfo, message::Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    /// Terminal regained focus (the page-visibility analogue).
    FocusRegained,
    /// One polling tick's worth of fetched state for the active chat.
    Poll(PollSnapshot),
    /// A file path pasted into the composer, to be sent as an image message.
    PasteImage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

/// Raw result of one polling tick, tagged with the chat and loop generation
/// it was fetched for so stale results can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSnapshot {
    pub generation: u64,
    pub chat_id: i64,
    pub messages: Vec<Message>,
    pub info: ChatInfo,
}

/// Derived notification payload for a message not authored locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub chat_name: String,
    pub preview: String,
    pub is_image: bool,
}
