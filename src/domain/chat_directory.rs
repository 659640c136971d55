use super::chat::ChatSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryUiState {
    Loading,
    Ready,
    Empty,
    Error,
}

/// Sidebar state: the latest directory snapshot for the current filter.
///
/// Refreshes replace the list wholesale; the selection is re-resolved by chat
/// id so it survives reordering and filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDirectoryState {
    ui_state: DirectoryUiState,
    chats: Vec<ChatSummary>,
    selected_index: Option<usize>,
}

impl Default for ChatDirectoryState {
    fn default() -> Self {
        Self {
            ui_state: DirectoryUiState::Loading,
            chats: Vec::new(),
            selected_index: None,
        }
    }
}

impl ChatDirectoryState {
    pub fn ui_state(&self) -> DirectoryUiState {
        self.ui_state.clone()
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_chat(&self) -> Option<&ChatSummary> {
        self.selected_index.and_then(|index| self.chats.get(index))
    }

    pub fn set_ready(&mut self, chats: Vec<ChatSummary>) {
        if chats.is_empty() {
            self.set_empty();
            return;
        }

        let previous_selected_chat_id = self.selected_chat().map(|chat| chat.chat_id);
        self.ui_state = DirectoryUiState::Ready;
        self.chats = chats;
        self.selected_index = resolve_selection_index(&self.chats, previous_selected_chat_id);
    }

    pub fn set_empty(&mut self) {
        self.ui_state = DirectoryUiState::Empty;
        self.chats.clear();
        self.selected_index = None;
    }

    pub fn set_error(&mut self) {
        self.ui_state = DirectoryUiState::Error;
        self.chats.clear();
        self.selected_index = None;
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.chats.len().saturating_sub(1);
        self.selected_index = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }
}

fn resolve_selection_index(
    chats: &[ChatSummary],
    previous_selected_chat_id: Option<i64>,
) -> Option<usize> {
    if chats.is_empty() {
        return None;
    }

    previous_selected_chat_id
        .and_then(|chat_id| chats.iter().position(|chat| chat.chat_id == chat_id))
        .or(Some(0))
}
