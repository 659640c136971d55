//! Ordered message history for the active conversation and its projection
//! into grouped presentation units.
//!
//! The projection inserts a date separator whenever the local calendar date
//! changes, shows an author label only on the first message of a same-author
//! run (group chats, non-local authors only), and classifies bodies as text
//! or image references. The rendered log is always replaced as a whole and
//! pinned to the bottom; there is no incremental patching.

use chrono::{Local, TimeZone};

use super::message::{ContentKind, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAlignment {
    /// Messages from other authors.
    Left,
    /// Messages authored by the local user.
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogContent {
    Text(String),
    ImageRef(String),
}

/// One message as presented in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub alignment: LogAlignment,
    /// Author display name, present only where the suppression rules show it.
    pub author_label: Option<String>,
    /// Avatar reference, present for non-local authors only.
    pub avatar_ref: Option<String>,
    pub content: LogContent,
    /// Locale time-of-day string.
    pub time: String,
}

/// A visual unit in the rendered log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// Date separator ("14 Feb 2026"), inserted on every date change
    /// including before the first message.
    DateSeparator(String),
    Message(LogMessage),
}

/// Projects an ordered message slice into presentation units.
///
/// The input order is preserved as-is; the server is the sole authority on
/// message ordering.
pub fn build_log_entries(messages: &[Message], local_user_id: i64, is_group: bool) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    let mut prev_date: Option<chrono::NaiveDate> = None;
    let mut prev_author: Option<i64> = None;

    for message in messages {
        let msg_date = timestamp_to_date(message.timestamp_ms);

        if prev_date != Some(msg_date) {
            entries.push(LogEntry::DateSeparator(format_date(msg_date)));
            // A new day starts a new author run.
            prev_author = None;
        }

        let is_local = message.author_id == local_user_id;
        let show_author = is_group && !is_local && prev_author != Some(message.author_id);

        entries.push(LogEntry::Message(LogMessage {
            alignment: if is_local {
                LogAlignment::Right
            } else {
                LogAlignment::Left
            },
            author_label: show_author.then(|| sanitize_text(&message.author_name)),
            avatar_ref: if is_local {
                None
            } else {
                message.author_avatar_ref.clone()
            },
            content: match message.content_kind() {
                ContentKind::ImageRef => LogContent::ImageRef(message.content.clone()),
                ContentKind::Text => LogContent::Text(sanitize_text(&message.content)),
            },
            time: format_time(message.timestamp_ms),
        }));

        prev_date = Some(msg_date);
        prev_author = Some(message.author_id);
    }

    entries
}

/// Strips terminal control characters from server-provided text.
///
/// Newlines and tabs survive; everything else in the C0/C1 ranges is dropped
/// so untrusted content cannot drive the terminal.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_control() || *ch == '\n' || *ch == '\t')
        .collect()
}

fn timestamp_to_date(timestamp_ms: i64) -> chrono::NaiveDate {
    match Local.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt.date_naive(),
        chrono::LocalResult::Ambiguous(dt, _) => dt.date_naive(),
        chrono::LocalResult::None => Local::now().date_naive(),
    }
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

fn format_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt.format("%H:%M").to_string(),
        chrono::LocalResult::Ambiguous(dt, _) => dt.format("%H:%M").to_string(),
        chrono::LocalResult::None => "??:??".to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogUiState {
    /// No chat selected.
    Empty,
    Loading,
    Ready,
    Error,
}

/// Message history state for the active conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLogState {
    messages: Vec<Message>,
    ui_state: LogUiState,
}

impl Default for MessageLogState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            ui_state: LogUiState::Empty,
        }
    }
}

impl MessageLogState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn ui_state(&self) -> LogUiState {
        self.ui_state.clone()
    }

    pub fn set_loading(&mut self) {
        self.messages.clear();
        self.ui_state = LogUiState::Loading;
    }

    /// Replaces the full history. Full replace, never an incremental patch.
    pub fn set_ready(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.ui_state = LogUiState::Ready;
    }

    pub fn set_error(&mut self) {
        self.ui_state = LogUiState::Error;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.ui_state = LogUiState::Empty;
    }

    /// Most recent image message, if any (for the open-in-viewer shortcut).
    pub fn latest_image_ref(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.is_image())
            .map(|message| message.content.as_str())
    }
}
