use crate::domain::chat::ChatSummary;

/// Directory query: empty text fetches the unfiltered directory, anything
/// else a server-side filtered one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryQuery {
    pub filter: String,
}

impl DirectoryQuery {
    pub fn unfiltered() -> Self {
        Self::default()
    }

    pub fn filtered(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

pub trait DirectorySource {
    fn list_chats(&self) -> Result<Vec<ChatSummary>, DirectorySourceError>;
    fn search_chats(&self, query: &str) -> Result<Vec<ChatSummary>, DirectorySourceError>;
}

impl<T> DirectorySource for &T
where
    T: DirectorySource + ?Sized,
{
    fn list_chats(&self) -> Result<Vec<ChatSummary>, DirectorySourceError> {
        (*self).list_chats()
    }

    fn search_chats(&self, query: &str) -> Result<Vec<ChatSummary>, DirectorySourceError> {
        (*self).search_chats(query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

/// Fetches the sidebar directory for a query, replacing the previous
/// snapshot wholesale.
pub fn fetch_directory(
    source: &dyn DirectorySource,
    query: &DirectoryQuery,
) -> Result<Vec<ChatSummary>, DirectoryError> {
    let filter = query.filter.trim();
    let chats = if filter.is_empty() {
        source.list_chats()
    } else {
        source.search_chats(filter)
    };

    chats.map_err(map_source_error)
}

fn map_source_error(error: DirectorySourceError) -> DirectoryError {
    match error {
        DirectorySourceError::Unauthorized => DirectoryError::Unauthorized,
        DirectorySourceError::Unavailable => DirectoryError::TemporarilyUnavailable,
        DirectorySourceError::InvalidData => DirectoryError::DataContractViolation,
    }
}
