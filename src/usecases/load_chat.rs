use crate::domain::{chat::ChatInfo, message::Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
    ChatNotFound,
}

/// Read access to one conversation's server state.
pub trait ChatSnapshotSource {
    fn chat_info(&self, chat_id: i64) -> Result<ChatInfo, SnapshotSourceError>;
    fn chat_messages(&self, chat_id: i64) -> Result<Vec<Message>, SnapshotSourceError>;
}

impl<T> ChatSnapshotSource for &T
where
    T: ChatSnapshotSource + ?Sized,
{
    fn chat_info(&self, chat_id: i64) -> Result<ChatInfo, SnapshotSourceError> {
        (*self).chat_info(chat_id)
    }

    fn chat_messages(&self, chat_id: i64) -> Result<Vec<Message>, SnapshotSourceError> {
        (*self).chat_messages(chat_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadChatError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
    ChatNotFound,
}

/// Header data plus full message history for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSnapshot {
    pub info: ChatInfo,
    pub messages: Vec<Message>,
}

pub fn load_chat_snapshot(
    source: &dyn ChatSnapshotSource,
    chat_id: i64,
) -> Result<ChatSnapshot, LoadChatError> {
    let info = source.chat_info(chat_id).map_err(map_source_error)?;
    let messages = source.chat_messages(chat_id).map_err(map_source_error)?;

    Ok(ChatSnapshot { info, messages })
}

pub fn load_messages(
    source: &dyn ChatSnapshotSource,
    chat_id: i64,
) -> Result<Vec<Message>, LoadChatError> {
    source.chat_messages(chat_id).map_err(map_source_error)
}

fn map_source_error(error: SnapshotSourceError) -> LoadChatError {
    match error {
        SnapshotSourceError::Unauthorized => LoadChatError::Unauthorized,
        SnapshotSourceError::Unavailable => LoadChatError::TemporarilyUnavailable,
        SnapshotSourceError::InvalidData => LoadChatError::DataContractViolation,
        SnapshotSourceError::ChatNotFound => LoadChatError::ChatNotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubSource {
        info: Result<ChatInfo, SnapshotSourceError>,
        messages: Result<Vec<Message>, SnapshotSourceError>,
        captured_chat_id: RefCell<Option<i64>>,
    }

    impl ChatSnapshotSource for StubSource {
        fn chat_info(&self, chat_id: i64) -> Result<ChatInfo, SnapshotSourceError> {
            *self.captured_chat_id.borrow_mut() = Some(chat_id);
            self.info.clone()
        }

        fn chat_messages(&self, chat_id: i64) -> Result<Vec<Message>, SnapshotSourceError> {
            *self.captured_chat_id.borrow_mut() = Some(chat_id);
            self.messages.clone()
        }
    }

    fn info(chat_id: i64) -> ChatInfo {
        ChatInfo {
            chat_id,
            name: "General".to_owned(),
            is_group: false,
            other_user: None,
            participant_count: 0,
            participants: vec![],
        }
    }

    fn message(content: &str) -> Message {
        Message {
            id: Some(1),
            chat_id: 42,
            author_id: 2,
            author_name: "Ana".to_owned(),
            author_avatar_ref: None,
            content: content.to_owned(),
            timestamp_ms: 1_000,
        }
    }

    #[test]
    fn snapshot_combines_info_and_messages() {
        let source = StubSource {
            info: Ok(info(42)),
            messages: Ok(vec![message("hola")]),
            captured_chat_id: RefCell::new(None),
        };

        let snapshot = load_chat_snapshot(&source, 42).expect("load should succeed");

        assert_eq!(snapshot.info.chat_id, 42);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(*source.captured_chat_id.borrow(), Some(42));
    }

    #[test]
    fn info_failure_fails_the_snapshot() {
        let source = StubSource {
            info: Err(SnapshotSourceError::ChatNotFound),
            messages: Ok(vec![]),
            captured_chat_id: RefCell::new(None),
        };

        let err = load_chat_snapshot(&source, 42).expect_err("must fail");

        assert_eq!(err, LoadChatError::ChatNotFound);
    }

    #[test]
    fn load_messages_maps_unavailable_error() {
        let source = StubSource {
            info: Ok(info(1)),
            messages: Err(SnapshotSourceError::Unavailable),
            captured_chat_id: RefCell::new(None),
        };

        let err = load_messages(&source, 1).expect_err("must fail");

        assert_eq!(err, LoadChatError::TemporarilyUnavailable);
    }

    #[test]
    fn load_messages_keeps_server_order() {
        let source = StubSource {
            info: Ok(info(1)),
            messages: Ok(vec![message("first"), message("second")]),
            captured_chat_id: RefCell::new(None),
        };

        let messages = load_messages(&source, 1).expect("load should succeed");

        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }
}
