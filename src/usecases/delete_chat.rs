#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteChatSourceError {
    Unauthorized,
    Unavailable,
    Rejected { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteChatError {
    Unauthorized,
    TemporarilyUnavailable,
    Rejected { message: String },
}

pub trait ChatDeleter {
    fn delete_chat(&self, chat_id: i64) -> Result<(), DeleteChatSourceError>;
}

impl<T: ChatDeleter + ?Sized> ChatDeleter for &T {
    fn delete_chat(&self, chat_id: i64) -> Result<(), DeleteChatSourceError> {
        (*self).delete_chat(chat_id)
    }
}

/// Deletes a conversation. Confirmation is the caller's responsibility; on
/// success the caller clears the session and reloads the directory.
pub fn delete_chat(deleter: &dyn ChatDeleter, chat_id: i64) -> Result<(), DeleteChatError> {
    deleter.delete_chat(chat_id).map_err(map_source_error)
}

fn map_source_error(error: DeleteChatSourceError) -> DeleteChatError {
    match error {
        DeleteChatSourceError::Unauthorized => DeleteChatError::Unauthorized,
        DeleteChatSourceError::Unavailable => DeleteChatError::TemporarilyUnavailable,
        DeleteChatSourceError::Rejected { message } => DeleteChatError::Rejected { message },
    }
}
