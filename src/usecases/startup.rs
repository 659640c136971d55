//! Startup sequence for the active-conversation session.
//!
//! Order matters: the cached identity is read first, then both the durable
//! slot and the server-side marker are cleared so a stale session is never
//! resumed silently (server restarts, multiple instances). The cached chat
//! is re-selected only if the freshly fetched directory still lists it.

use crate::{
    domain::chat::ChatSummary,
    infra::{error::AppError, session_vault::StoredSession},
    usecases::{
        list_chats::{fetch_directory, DirectoryQuery, DirectorySource},
        session_store::{ActiveChatSink, SessionStore},
    },
};

const STARTUP_DIRECTORY_FAILED: &str = "STARTUP_DIRECTORY_FETCH_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupPlan {
    /// The initial directory, or None when the fetch failed (the sidebar
    /// starts in its error state).
    pub chats: Option<Vec<ChatSummary>>,
    /// Cached identity to re-select, present only when the chat still
    /// exists in the directory.
    pub restore: Option<StoredSession>,
}

pub fn plan_startup<S, D>(
    store: &SessionStore<S>,
    directory: &D,
) -> Result<StartupPlan, AppError>
where
    S: ActiveChatSink,
    D: DirectorySource,
{
    let cached = store.restore()?;
    store.clear()?;

    let chats = match fetch_directory(&directory, &DirectoryQuery::unfiltered()) {
        Ok(chats) => Some(chats),
        Err(error) => {
            tracing::warn!(
                code = STARTUP_DIRECTORY_FAILED,
                error = ?error,
                "initial directory fetch failed"
            );
            None
        }
    };

    let restore = cached.filter(|stored| {
        chats
            .as_deref()
            .map(|chats| chats.iter().any(|chat| chat.chat_id == stored.chat_id))
            .unwrap_or(false)
    });

    Ok(StartupPlan { chats, restore })
}
