//! Synchronous facade over the async HTTP client for the shell thread.
//!
//! The shell runs outside the runtime and bridges in with `block_on`; the
//! background tasks (polling loop, presence heartbeat) use the async client
//! directly. This adapter also maps transport errors onto the per-usecase
//! source error vocabularies.

use std::time::Duration;

use tokio::runtime::Handle;

use crate::{
    domain::chat::{ChatInfo, ChatSummary, LocalUser, UserSummary},
    domain::message::Message,
    usecases::{
        create_chat::{ChatCreator, CreateChatSourceError, UserDirectorySource},
        delete_chat::{ChatDeleter, DeleteChatSourceError},
        list_chats::{DirectorySource, DirectorySourceError},
        load_chat::{ChatSnapshotSource, SnapshotSourceError},
        logout::SessionTerminator,
        send_image::{ImageSender, SendImageSourceError},
        send_message::{MessageSender, SendMessageSourceError},
        session_store::{ActiveChatSink, ActiveChatSinkError},
    },
};

use super::client::{ApiError, HttpChatApi};

const LOGOUT_BEACON_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct BlockingChatApi {
    api: HttpChatApi,
    handle: Handle,
}

impl BlockingChatApi {
    pub fn new(api: HttpChatApi, handle: Handle) -> Self {
        Self { api, handle }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LocalUser, ApiError> {
        self.handle.block_on(self.api.login(email, password))
    }

    /// One best-effort presence farewell on teardown; a dead server must not
    /// delay shutdown past the timeout.
    pub fn fire_logout_beacon(&self) {
        let _ = self.handle.block_on(async {
            tokio::time::timeout(LOGOUT_BEACON_TIMEOUT, self.api.logout()).await
        });
    }
}

impl DirectorySource for BlockingChatApi {
    fn list_chats(&self) -> Result<Vec<ChatSummary>, DirectorySourceError> {
        self.handle
            .block_on(self.api.list_chats())
            .map_err(directory_error)
    }

    fn search_chats(&self, query: &str) -> Result<Vec<ChatSummary>, DirectorySourceError> {
        self.handle
            .block_on(self.api.search_chats(query))
            .map_err(directory_error)
    }
}

impl ChatSnapshotSource for BlockingChatApi {
    fn chat_info(&self, chat_id: i64) -> Result<ChatInfo, SnapshotSourceError> {
        self.handle
            .block_on(self.api.chat_info(chat_id))
            .map_err(snapshot_error)
    }

    fn chat_messages(&self, chat_id: i64) -> Result<Vec<Message>, SnapshotSourceError> {
        self.handle
            .block_on(self.api.chat_messages(chat_id))
            .map_err(snapshot_error)
    }
}

impl MessageSender for BlockingChatApi {
    fn send_message(&self, chat_id: i64, text: &str) -> Result<(), SendMessageSourceError> {
        self.handle
            .block_on(self.api.send_message(chat_id, text))
            .map_err(|error| match &error {
                ApiError::Rejected { status: 401, .. } => SendMessageSourceError::Unauthorized,
                ApiError::Rejected { status: 404, .. } => SendMessageSourceError::ChatNotFound,
                ApiError::Rejected { message, .. } => SendMessageSourceError::Rejected {
                    message: message.clone(),
                },
                _ => SendMessageSourceError::Unavailable,
            })
    }
}

impl ImageSender for BlockingChatApi {
    fn send_image(
        &self,
        chat_id: i64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<(), SendImageSourceError> {
        self.handle
            .block_on(self.api.send_image(chat_id, file_name, bytes))
            .map_err(|error| match &error {
                ApiError::Rejected { status: 401, .. } => SendImageSourceError::Unauthorized,
                ApiError::Rejected { message, .. } => SendImageSourceError::Rejected {
                    message: message.clone(),
                },
                _ => SendImageSourceError::Unavailable,
            })
    }
}

impl ChatCreator for BlockingChatApi {
    fn create_chat(
        &self,
        name: &str,
        participants: &[i64],
        is_group: bool,
    ) -> Result<(), CreateChatSourceError> {
        self.handle
            .block_on(self.api.create_chat(name, participants, is_group))
            .map_err(create_error)
    }
}

impl ChatDeleter for BlockingChatApi {
    fn delete_chat(&self, chat_id: i64) -> Result<(), DeleteChatSourceError> {
        self.handle
            .block_on(self.api.delete_chat(chat_id))
            .map_err(|error| match &error {
                ApiError::Rejected { status: 401, .. } => DeleteChatSourceError::Unauthorized,
                ApiError::Rejected { message, .. } => DeleteChatSourceError::Rejected {
                    message: message.clone(),
                },
                _ => DeleteChatSourceError::Unavailable,
            })
    }
}

impl UserDirectorySource for BlockingChatApi {
    fn list_users(&self) -> Result<Vec<UserSummary>, CreateChatSourceError> {
        self.handle
            .block_on(self.api.list_users())
            .map_err(create_error)
    }
}

impl ActiveChatSink for BlockingChatApi {
    fn set_active_chat(&self, chat_id: i64) -> Result<(), ActiveChatSinkError> {
        self.handle
            .block_on(self.api.update_active_chat(chat_id))
            .map_err(sink_error)
    }

    fn clear_active_chat(&self) -> Result<(), ActiveChatSinkError> {
        self.handle
            .block_on(self.api.clear_active_chat())
            .map_err(sink_error)
    }
}

impl SessionTerminator for BlockingChatApi {
    fn logout(&self) -> Result<(), String> {
        self.handle
            .block_on(self.api.logout())
            .map_err(|error| error.to_string())
    }
}

fn directory_error(error: ApiError) -> DirectorySourceError {
    if error.is_unauthorized() {
        return DirectorySourceError::Unauthorized;
    }
    match error {
        ApiError::InvalidData { .. } => DirectorySourceError::InvalidData,
        _ => DirectorySourceError::Unavailable,
    }
}

fn snapshot_error(error: ApiError) -> SnapshotSourceError {
    match error {
        ApiError::Rejected { status: 401, .. } => SnapshotSourceError::Unauthorized,
        ApiError::Rejected { status: 404, .. } => SnapshotSourceError::ChatNotFound,
        ApiError::InvalidData { .. } => SnapshotSourceError::InvalidData,
        _ => SnapshotSourceError::Unavailable,
    }
}

fn create_error(error: ApiError) -> CreateChatSourceError {
    match error {
        ApiError::Rejected { status: 401, .. } => CreateChatSourceError::Unauthorized,
        ApiError::Rejected { message, .. } => CreateChatSourceError::Rejected { message },
        _ => CreateChatSourceError::Unavailable,
    }
}

fn sink_error(error: ApiError) -> ActiveChatSinkError {
    match error {
        ApiError::Rejected { message, .. } => ActiveChatSinkError::Rejected { message },
        _ => ActiveChatSinkError::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16) -> ApiError {
        ApiError::Rejected {
            endpoint: "/x".to_owned(),
            status,
            message: "nope".to_owned(),
        }
    }

    #[test]
    fn directory_errors_map_by_status() {
        assert_eq!(
            directory_error(rejected(401)),
            DirectorySourceError::Unauthorized
        );
        assert_eq!(
            directory_error(rejected(500)),
            DirectorySourceError::Unavailable
        );
        assert_eq!(
            directory_error(ApiError::InvalidData {
                endpoint: "/x".to_owned(),
                details: "bad json".to_owned()
            }),
            DirectorySourceError::InvalidData
        );
    }

    #[test]
    fn snapshot_errors_distinguish_missing_chats() {
        assert_eq!(
            snapshot_error(rejected(404)),
            SnapshotSourceError::ChatNotFound
        );
        assert_eq!(
            snapshot_error(rejected(401)),
            SnapshotSourceError::Unauthorized
        );
    }

    #[test]
    fn sink_errors_keep_the_server_message() {
        assert_eq!(
            sink_error(rejected(403)),
            ActiveChatSinkError::Rejected {
                message: "nope".to_owned()
            }
        );
    }
}
