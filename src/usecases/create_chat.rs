use crate::domain::chat::UserSummary;

/// Command to create a conversation with the selected participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChatCommand {
    pub name: String,
    pub participants: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateChatSourceError {
    Unauthorized,
    Unavailable,
    Rejected { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateChatError {
    EmptyName,
    NoParticipants,
    Unauthorized,
    TemporarilyUnavailable,
    Rejected { message: String },
}

pub trait ChatCreator {
    fn create_chat(
        &self,
        name: &str,
        participants: &[i64],
        is_group: bool,
    ) -> Result<(), CreateChatSourceError>;
}

impl<T: ChatCreator + ?Sized> ChatCreator for &T {
    fn create_chat(
        &self,
        name: &str,
        participants: &[i64],
        is_group: bool,
    ) -> Result<(), CreateChatSourceError> {
        (*self).create_chat(name, participants, is_group)
    }
}

/// Users selectable as participants in the new-chat flow.
pub trait UserDirectorySource {
    fn list_users(&self) -> Result<Vec<UserSummary>, CreateChatSourceError>;
}

impl<T: UserDirectorySource + ?Sized> UserDirectorySource for &T {
    fn list_users(&self) -> Result<Vec<UserSummary>, CreateChatSourceError> {
        (*self).list_users()
    }
}

/// Validates the command and creates the chat. A conversation with more than
/// one participant besides the local user is a group.
pub fn create_chat(
    creator: &dyn ChatCreator,
    command: CreateChatCommand,
) -> Result<(), CreateChatError> {
    let name = command.name.trim();
    if name.is_empty() {
        return Err(CreateChatError::EmptyName);
    }

    if command.participants.is_empty() {
        return Err(CreateChatError::NoParticipants);
    }

    let is_group = command.participants.len() > 1;
    creator
        .create_chat(name, &command.participants, is_group)
        .map_err(map_source_error)
}

fn map_source_error(error: CreateChatSourceError) -> CreateChatError {
    match error {
        CreateChatSourceError::Unauthorized => CreateChatError::Unauthorized,
        CreateChatSourceError::Unavailable => CreateChatError::TemporarilyUnavailable,
        CreateChatSourceError::Rejected { message } => CreateChatError::Rejected { message },
    }
}
