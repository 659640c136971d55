use super::{
    chat::UserSummary,
    chat_directory::ChatDirectoryState,
    events::NotificationEvent,
    message_input_state::MessageInputState,
    message_log::MessageLogState,
    session::ActiveSession,
};

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneFocus {
    #[default]
    Directory,
    Filter,
    Composer,
}

/// Synchronization phase of the active-conversation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// No active chat.
    #[default]
    Idle,
    /// A selection is in flight; a newer selection may still supersede it.
    Transitioning,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Info,
    Error,
}

/// Transient one-line feedback shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNote {
    pub kind: NoteKind,
    pub text: String,
}

/// Header of the conversation pane, re-projected on every info fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatHeader {
    /// "Select a chat" placeholder.
    #[default]
    None,
    Individual {
        name: String,
        is_online: bool,
    },
    Group {
        name: String,
        participant_count: u32,
        participant_names: String,
    },
}

/// Stage of the new-chat prompt flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStage {
    ChatName,
    Participants { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatPrompt {
    pub stage: PromptStage,
    pub input: MessageInputState,
    pub users: Vec<UserSummary>,
}

/// Aggregate state rendered by the view. Mutated only by the sync controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    local_user_id: i64,
    focus: PaneFocus,
    phase: SyncPhase,
    session: Option<ActiveSession>,
    directory: ChatDirectoryState,
    log: MessageLogState,
    header: ChatHeader,
    composer: MessageInputState,
    filter_input: MessageInputState,
    status: Option<StatusNote>,
    pending_delete: bool,
    new_chat: Option<NewChatPrompt>,
    last_notification: Option<NotificationEvent>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            local_user_id: 0,
            focus: PaneFocus::Directory,
            phase: SyncPhase::Idle,
            session: None,
            directory: ChatDirectoryState::default(),
            log: MessageLogState::default(),
            header: ChatHeader::None,
            composer: MessageInputState::default(),
            filter_input: MessageInputState::default(),
            status: None,
            pending_delete: false,
            new_chat: None,
            last_notification: None,
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Id of the authenticated local user, for alignment and labeling rules.
    pub fn local_user_id(&self) -> i64 {
        self.local_user_id
    }

    pub fn set_local_user_id(&mut self, user_id: i64) {
        self.local_user_id = user_id;
    }

    pub fn focus(&self) -> PaneFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: PaneFocus) {
        self.focus = focus;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: SyncPhase) {
        self.phase = phase;
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut ActiveSession> {
        self.session.as_mut()
    }

    pub fn set_session(&mut self, session: Option<ActiveSession>) {
        self.session = session;
    }

    pub fn directory(&self) -> &ChatDirectoryState {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut ChatDirectoryState {
        &mut self.directory
    }

    pub fn log(&self) -> &MessageLogState {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLogState {
        &mut self.log
    }

    pub fn header(&self) -> &ChatHeader {
        &self.header
    }

    pub fn set_header(&mut self, header: ChatHeader) {
        self.header = header;
    }

    pub fn composer(&self) -> &MessageInputState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut MessageInputState {
        &mut self.composer
    }

    pub fn filter_input(&self) -> &MessageInputState {
        &self.filter_input
    }

    pub fn filter_input_mut(&mut self) -> &mut MessageInputState {
        &mut self.filter_input
    }

    pub fn status(&self) -> Option<&StatusNote> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, kind: NoteKind, text: impl Into<String>) {
        self.status = Some(StatusNote {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn pending_delete(&self) -> bool {
        self.pending_delete
    }

    pub fn set_pending_delete(&mut self, pending: bool) {
        self.pending_delete = pending;
    }

    pub fn new_chat(&self) -> Option<&NewChatPrompt> {
        self.new_chat.as_ref()
    }

    pub fn new_chat_mut(&mut self) -> Option<&mut NewChatPrompt> {
        self.new_chat.as_mut()
    }

    pub fn set_new_chat(&mut self, prompt: Option<NewChatPrompt>) {
        self.new_chat = prompt;
    }

    pub fn last_notification(&self) -> Option<&NotificationEvent> {
        self.last_notification.as_ref()
    }

    pub fn set_last_notification(&mut self, event: NotificationEvent) {
        self.last_notification = Some(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle_and_running() {
        let state = ShellState::default();

        assert!(state.is_running());
        assert_eq!(state.phase(), SyncPhase::Idle);
        assert!(state.session().is_none());
        assert_eq!(state.focus(), PaneFocus::Directory);
        assert_eq!(*state.header(), ChatHeader::None);
    }

    #[test]
    fn stop_halts_the_shell() {
        let mut state = ShellState::default();

        state.stop();

        assert!(!state.is_running());
    }

    #[test]
    fn status_note_replaces_previous_note() {
        let mut state = ShellState::default();
        state.set_status(NoteKind::Info, "first");
        state.set_status(NoteKind::Error, "second");

        let note = state.status().expect("note should be set");
        assert_eq!(note.kind, NoteKind::Error);
        assert_eq!(note.text, "second");
    }
}
