//! Use case for sending a text message to the active chat.
//!
//! There is no optimistic insertion: on success the caller refetches the
//! message history so the rendered log always reflects server-confirmed
//! state.

/// Command to send a message to a specific chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageSourceError {
    Unauthorized,
    ChatNotFound,
    Unavailable,
    Rejected { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Message text is empty after trimming whitespace.
    EmptyMessage,
    Unauthorized,
    ChatNotFound,
    TemporarilyUnavailable,
    Rejected { message: String },
}

pub trait MessageSender {
    fn send_message(&self, chat_id: i64, text: &str) -> Result<(), SendMessageSourceError>;
}

impl<T: MessageSender + ?Sized> MessageSender for &T {
    fn send_message(&self, chat_id: i64, text: &str) -> Result<(), SendMessageSourceError> {
        (*self).send_message(chat_id, text)
    }
}

/// Validates the text (must not be empty after trimming) and delegates to the
/// sender.
pub fn send_message(
    sender: &dyn MessageSender,
    command: SendMessageCommand,
) -> Result<(), SendMessageError> {
    let text = command.text.trim();
    if text.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    sender
        .send_message(command.chat_id, text)
        .map_err(map_source_error)
}

fn map_source_error(error: SendMessageSourceError) -> SendMessageError {
    match error {
        SendMessageSourceError::Unauthorized => SendMessageError::Unauthorized,
        SendMessageSourceError::ChatNotFound => SendMessageError::ChatNotFound,
        SendMessageSourceError::Unavailable => SendMessageError::TemporarilyUnavailable,
        SendMessageSourceError::Rejected { message } => SendMessageError::Rejected { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubSender {
        result: Result<(), SendMessageSourceError>,
        captured_chat_id: RefCell<Option<i64>>,
        captured_text: RefCell<Option<String>>,
    }

    impl StubSender {
        fn with_result(result: Result<(), SendMessageSourceError>) -> Self {
            Self {
                result,
                captured_chat_id: RefCell::new(None),
                captured_text: RefCell::new(None),
            }
        }
    }

    impl MessageSender for StubSender {
        fn send_message(&self, chat_id: i64, text: &str) -> Result<(), SendMessageSourceError> {
            *self.captured_chat_id.borrow_mut() = Some(chat_id);
            *self.captured_text.borrow_mut() = Some(text.to_owned());
            self.result.clone()
        }
    }

    #[test]
    fn rejects_empty_message_text() {
        let sender = StubSender::with_result(Ok(()));

        let result = send_message(
            &sender,
            SendMessageCommand {
                chat_id: 1,
                text: String::new(),
            },
        );

        assert_eq!(result, Err(SendMessageError::EmptyMessage));
        assert!(sender.captured_chat_id.borrow().is_none());
    }

    #[test]
    fn rejects_whitespace_only_message() {
        let sender = StubSender::with_result(Ok(()));

        let result = send_message(
            &sender,
            SendMessageCommand {
                chat_id: 1,
                text: "   \n\t  ".to_owned(),
            },
        );

        assert_eq!(result, Err(SendMessageError::EmptyMessage));
    }

    #[test]
    fn trims_whitespace_before_sending() {
        let sender = StubSender::with_result(Ok(()));

        let _ = send_message(
            &sender,
            SendMessageCommand {
                chat_id: 42,
                text: "  hello world  ".to_owned(),
            },
        );

        assert_eq!(
            *sender.captured_text.borrow(),
            Some("hello world".to_owned())
        );
        assert_eq!(*sender.captured_chat_id.borrow(), Some(42));
    }

    #[test]
    fn returns_ok_on_successful_send() {
        let sender = StubSender::with_result(Ok(()));

        let result = send_message(
            &sender,
            SendMessageCommand {
                chat_id: 1,
                text: "hola".to_owned(),
            },
        );

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn maps_server_rejection_with_message() {
        let sender = StubSender::with_result(Err(SendMessageSourceError::Rejected {
            message: "Chat not found".to_owned(),
        }));

        let result = send_message(
            &sender,
            SendMessageCommand {
                chat_id: 1,
                text: "hola".to_owned(),
            },
        );

        assert_eq!(
            result,
            Err(SendMessageError::Rejected {
                message: "Chat not found".to_owned()
            })
        );
    }

    #[test]
    fn maps_unavailable_error() {
        let sender = StubSender::with_result(Err(SendMessageSourceError::Unavailable));

        let result = send_message(
            &sender,
            SendMessageCommand {
                chat_id: 1,
                text: "hola".to_owned(),
            },
        );

        assert_eq!(result, Err(SendMessageError::TemporarilyUnavailable));
    }
}
