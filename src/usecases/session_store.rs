//! Durable active-conversation identity, kept in agreement with the server's
//! notion of this client's active chat.

use crate::infra::{
    error::AppError,
    session_vault::{SessionVault, StoredSession},
};

const ACTIVE_CHAT_SYNC_FAILED: &str = "SESSION_ACTIVE_CHAT_SYNC_FAILED";
const ACTIVE_CHAT_CLEAR_FAILED: &str = "SESSION_ACTIVE_CHAT_CLEAR_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveChatSinkError {
    Unavailable,
    Rejected { message: String },
}

/// Server side of the active-chat marker. All calls are best-effort: the
/// marker only affects presence, never correctness.
pub trait ActiveChatSink {
    fn set_active_chat(&self, chat_id: i64) -> Result<(), ActiveChatSinkError>;
    fn clear_active_chat(&self) -> Result<(), ActiveChatSinkError>;
}

impl<T: ActiveChatSink + ?Sized> ActiveChatSink for &T {
    fn set_active_chat(&self, chat_id: i64) -> Result<(), ActiveChatSinkError> {
        (*self).set_active_chat(chat_id)
    }

    fn clear_active_chat(&self) -> Result<(), ActiveChatSinkError> {
        (*self).clear_active_chat()
    }
}

/// Persists which conversation is active across restarts and mirrors it to
/// the server.
#[derive(Debug)]
pub struct SessionStore<S: ActiveChatSink> {
    vault: SessionVault,
    sink: S,
}

impl<S: ActiveChatSink> SessionStore<S> {
    pub fn new(vault: SessionVault, sink: S) -> Self {
        Self { vault, sink }
    }

    /// Reads the stored identity without fetching anything else.
    pub fn restore(&self) -> Result<Option<StoredSession>, AppError> {
        self.vault.read()
    }

    /// Writes the durable slot and tells the server which chat is active.
    /// The server leg is best-effort and only logged on failure.
    pub fn persist(&self, chat_id: i64, chat_name: &str) -> Result<(), AppError> {
        self.vault.write(&StoredSession {
            chat_id,
            chat_name: chat_name.to_owned(),
        })?;

        if let Err(error) = self.sink.set_active_chat(chat_id) {
            tracing::warn!(
                code = ACTIVE_CHAT_SYNC_FAILED,
                chat_id,
                error = ?error,
                "server active-chat marker not updated"
            );
        }

        Ok(())
    }

    /// Wipes the durable slot and the server-side marker. Run at startup so
    /// no stale session is resumed silently, and again on chat deletion.
    pub fn clear(&self) -> Result<(), AppError> {
        self.vault.clear()?;

        if let Err(error) = self.sink.clear_active_chat() {
            tracing::warn!(
                code = ACTIVE_CHAT_CLEAR_FAILED,
                error = ?error,
                "server active-chat marker not cleared"
            );
        }

        Ok(())
    }
}
