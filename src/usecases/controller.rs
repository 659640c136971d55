//! The synchronization controller: owner of the active-conversation state
//! machine.
//!
//! All shared mutable state (the active session, the rendered log, the
//! running poll loop) is owned here; nothing else mutates it. Selection is
//! not reentrant: a newer selection stops the previous polling loop first
//! and bumps the loop generation, and every asynchronous result carries the
//! (generation, chat id) pair it was fetched for and is dropped on mismatch.

use anyhow::Result;

use crate::{
    domain::{
        chat::{ChatInfo, LocalUser},
        events::{AppEvent, KeyInput, NotificationEvent, PollSnapshot},
        message_log::LogUiState,
        session::ActiveSession,
        shell_state::{
            ChatHeader, NewChatPrompt, NoteKind, PaneFocus, PromptStage, ShellState, SyncPhase,
        },
    },
    infra::contracts::{ExternalOpener, Notifier},
    usecases::{
        contracts::{PollDriver, ShellOrchestrator},
        create_chat::{create_chat, ChatCreator, CreateChatCommand, CreateChatError,
            UserDirectorySource},
        delete_chat::{delete_chat, ChatDeleter, DeleteChatError},
        list_chats::{fetch_directory, DirectoryQuery, DirectorySource},
        load_chat::{load_chat_snapshot, load_messages, ChatSnapshotSource},
        send_image::{send_image_from_path, ImageSender, SendImageError},
        send_message::{send_message, MessageSender, SendMessageCommand, SendMessageError},
        session_store::{ActiveChatSink, SessionStore},
        startup::plan_startup,
    },
};

const SELECT_SNAPSHOT_FAILED: &str = "SYNC_SELECT_SNAPSHOT_FAILED";
const SESSION_PERSIST_FAILED: &str = "SYNC_SESSION_PERSIST_FAILED";
const SESSION_CLEAR_FAILED: &str = "SYNC_SESSION_CLEAR_FAILED";
const STALE_POLL_DISCARDED: &str = "SYNC_STALE_POLL_DISCARDED";
const SEND_REFRESH_FAILED: &str = "SYNC_SEND_REFRESH_FAILED";
const DIRECTORY_REFRESH_FAILED: &str = "SYNC_DIRECTORY_REFRESH_FAILED";
const STARTUP_FAILED: &str = "SYNC_STARTUP_FAILED";

/// Everything the controller asks of the server, as one bound.
pub trait SyncApi:
    DirectorySource
    + ChatSnapshotSource
    + MessageSender
    + ImageSender
    + ChatCreator
    + ChatDeleter
    + UserDirectorySource
{
}

impl<T> SyncApi for T where
    T: DirectorySource
        + ChatSnapshotSource
        + MessageSender
        + ImageSender
        + ChatCreator
        + ChatDeleter
        + UserDirectorySource
{
}

pub struct SyncController<A, S, P, N, O>
where
    A: SyncApi,
    S: ActiveChatSink,
    P: PollDriver,
    N: Notifier,
    O: ExternalOpener,
{
    state: ShellState,
    api: A,
    session_store: SessionStore<S>,
    poller: P,
    notifier: N,
    opener: O,
    local_user: LocalUser,
    notifications_enabled: bool,
    /// Base URL for resolving server-relative image references.
    asset_base_url: String,
    generation: u64,
}

impl<A, S, P, N, O> SyncController<A, S, P, N, O>
where
    A: SyncApi,
    S: ActiveChatSink,
    P: PollDriver,
    N: Notifier,
    O: ExternalOpener,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api: A,
        session_store: SessionStore<S>,
        poller: P,
        notifier: N,
        opener: O,
        local_user: LocalUser,
        notifications_enabled: bool,
        asset_base_url: String,
    ) -> Self {
        let mut state = ShellState::default();
        state.set_local_user_id(local_user.user_id);

        Self {
            state,
            api,
            session_store,
            poller,
            notifier,
            opener,
            local_user,
            notifications_enabled,
            asset_base_url,
            generation: 0,
        }
    }

    /// Current polling-loop generation; results tagged with an older value
    /// are stale.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs the startup sequence: read the cached session identity, clear
    /// the durable slot and the server marker, fetch the directory, and
    /// re-select the cached chat if it is still listed.
    pub fn run_startup(&mut self) {
        match plan_startup(&self.session_store, &self.api) {
            Ok(plan) => {
                match plan.chats {
                    Some(chats) => self.state.directory_mut().set_ready(chats),
                    None => self.state.directory_mut().set_error(),
                }
                if let Some(stored) = plan.restore {
                    self.select_chat(stored.chat_id, stored.chat_name);
                }
            }
            Err(error) => {
                tracing::warn!(
                    code = STARTUP_FAILED,
                    error = ?error,
                    "startup session restore failed"
                );
                self.state.directory_mut().set_error();
            }
        }
    }

    /// Selects a conversation, completing the Idle/Active -> Transitioning ->
    /// Active transition. The previous polling loop stops before anything
    /// else happens; the new one starts only once the initial snapshot has
    /// rendered.
    pub fn select_chat(&mut self, chat_id: i64, chat_name: String) {
        self.poller.stop();
        self.generation = self.generation.wrapping_add(1);

        self.state.set_phase(SyncPhase::Transitioning);
        self.state.log_mut().set_loading();
        self.state.clear_status();
        self.state.set_pending_delete(false);

        if let Err(error) = self.session_store.persist(chat_id, &chat_name) {
            tracing::warn!(
                code = SESSION_PERSIST_FAILED,
                chat_id,
                error = ?error,
                "active-session identity not persisted"
            );
        }

        match load_chat_snapshot(&self.api, chat_id) {
            Ok(snapshot) => {
                let mut session = ActiveSession::new(chat_id, chat_name, snapshot.info.is_group);
                if let Some(newest) = snapshot.messages.last() {
                    session.advance_last_seen(newest.timestamp_ms);
                }

                self.state.set_header(header_from_info(&snapshot.info));
                self.state.log_mut().set_ready(snapshot.messages);
                self.state.set_session(Some(session));
            }
            Err(error) => {
                // The fixed poll interval is the retry mechanism: the loop
                // still starts and repairs the view on its first good tick.
                tracing::warn!(
                    code = SELECT_SNAPSHOT_FAILED,
                    chat_id,
                    error = ?error,
                    "initial conversation snapshot failed"
                );
                self.state.set_header(ChatHeader::None);
                self.state.log_mut().set_error();
                self.state
                    .set_session(Some(ActiveSession::new(chat_id, chat_name, false)));
                self.state
                    .set_status(NoteKind::Error, "Failed to load conversation");
            }
        }

        self.state.set_phase(SyncPhase::Active);
        self.poller.restart(chat_id, self.generation);
    }

    /// Applies one polling tick. Stale snapshots (older generation or a chat
    /// that is no longer active) are discarded, never an error.
    fn apply_poll(&mut self, snapshot: PollSnapshot) {
        let current_chat = self.state.session().map(|session| session.chat_id);
        if snapshot.generation != self.generation || current_chat != Some(snapshot.chat_id) {
            tracing::debug!(
                code = STALE_POLL_DISCARDED,
                snapshot_generation = snapshot.generation,
                current_generation = self.generation,
                snapshot_chat = snapshot.chat_id,
                "discarding poll result for a superseded selection"
            );
            return;
        }

        // Chat info applies unconditionally on every tick.
        self.state.set_header(header_from_info(&snapshot.info));
        let chat_name = snapshot.info.name.clone();
        let is_group = snapshot.info.is_group;
        if let Some(session) = self.state.session_mut() {
            session.chat_name = chat_name;
            session.is_group = is_group;
        }

        let log_ready = matches!(self.state.log().ui_state(), LogUiState::Ready);

        if snapshot.messages.is_empty() {
            if !log_ready {
                self.state.log_mut().set_ready(snapshot.messages);
            }
            return;
        }

        let newest = &snapshot.messages[snapshot.messages.len() - 1];
        let newest_ts = newest.timestamp_ms;
        let author_id = newest.author_id;
        let preview = newest.notification_preview();
        let is_image = newest.is_image();

        let advanced = self
            .state
            .session_mut()
            .map(|session| session.advance_last_seen(newest_ts))
            .unwrap_or(false);

        if advanced || !log_ready {
            self.state.log_mut().set_ready(snapshot.messages);
        }

        if advanced && author_id != self.local_user.user_id {
            self.emit_notification(preview, is_image);
        }
    }

    /// Notification events fire only when the permission flag is granted;
    /// otherwise nothing happens, which is not an error.
    fn emit_notification(&mut self, preview: String, is_image: bool) {
        if !self.notifications_enabled {
            return;
        }

        let Some(session) = self.state.session() else {
            return;
        };

        let event = NotificationEvent {
            chat_name: session.chat_name.clone(),
            preview,
            is_image,
        };
        self.notifier.notify(&event);
        self.state.set_last_notification(event);
    }

    /// Sends the composed text. No optimistic insertion: the log is refetched
    /// so it always reflects server-confirmed state, and the message appears
    /// exactly once even though the next poll tick fetches it again.
    fn send_composed_message(&mut self) {
        let Some(chat_id) = self.state.session().map(|session| session.chat_id) else {
            return;
        };

        let text = self.state.composer_mut().take();
        match send_message(
            &self.api,
            SendMessageCommand {
                chat_id,
                text: text.clone(),
            },
        ) {
            Ok(()) => self.refresh_active_log(chat_id),
            Err(SendMessageError::EmptyMessage) => {}
            Err(error) => {
                // Writes are not retried automatically; the text is restored
                // so the user can re-submit.
                self.state.composer_mut().set_text(text);
                self.state
                    .set_status(NoteKind::Error, send_error_text(&error));
            }
        }
    }

    fn send_pasted_image(&mut self, path: String) {
        if self.state.focus() != PaneFocus::Composer {
            return;
        }

        let Some(chat_id) = self.state.session().map(|session| session.chat_id) else {
            return;
        };

        match send_image_from_path(&self.api, chat_id, std::path::Path::new(&path)) {
            Ok(()) => {
                self.state.set_status(NoteKind::Info, "Image sent");
                self.refresh_active_log(chat_id);
            }
            Err(error) => {
                self.state
                    .set_status(NoteKind::Error, send_image_error_text(&error));
            }
        }
    }

    /// Immediate authoritative refetch after a successful write.
    fn refresh_active_log(&mut self, chat_id: i64) {
        match load_messages(&self.api, chat_id) {
            Ok(messages) => {
                if let (Some(newest), Some(session)) =
                    (messages.last(), self.state.session_mut())
                {
                    session.advance_last_seen(newest.timestamp_ms);
                }
                self.state.log_mut().set_ready(messages);
            }
            Err(error) => {
                // The next poll tick repairs the view.
                tracing::warn!(
                    code = SEND_REFRESH_FAILED,
                    chat_id,
                    error = ?error,
                    "post-send history refresh failed"
                );
            }
        }
    }

    fn request_delete(&mut self) {
        if self.state.session().is_none() {
            return;
        }

        self.state.set_pending_delete(true);
        self.state.set_status(
            NoteKind::Info,
            "Delete this chat? Press 'y' to confirm, any other key to cancel",
        );
    }

    fn resolve_pending_delete(&mut self, key: &KeyInput) {
        self.state.set_pending_delete(false);
        if key.key != "y" {
            self.state.clear_status();
            return;
        }

        let Some(chat_id) = self.state.session().map(|session| session.chat_id) else {
            return;
        };

        match delete_chat(&self.api, chat_id) {
            Ok(()) => {
                self.poller.stop();
                self.generation = self.generation.wrapping_add(1);

                if let Err(error) = self.session_store.clear() {
                    tracing::warn!(
                        code = SESSION_CLEAR_FAILED,
                        error = ?error,
                        "session not cleared after deletion"
                    );
                }

                self.state.set_session(None);
                self.state.set_phase(SyncPhase::Idle);
                self.state.log_mut().clear();
                self.state.set_header(ChatHeader::None);
                self.refresh_directory();
                self.state.set_status(NoteKind::Info, "Chat deleted");
            }
            Err(error) => {
                self.state
                    .set_status(NoteKind::Error, delete_error_text(&error));
            }
        }
    }

    /// Refetches the directory for the current filter, replacing the list
    /// wholesale.
    pub fn refresh_directory(&mut self) {
        let query = DirectoryQuery::filtered(self.state.filter_input().text());

        match fetch_directory(&self.api, &query) {
            Ok(chats) => self.state.directory_mut().set_ready(chats),
            Err(error) => {
                tracing::warn!(
                    code = DIRECTORY_REFRESH_FAILED,
                    error = ?error,
                    "directory refresh failed"
                );
                self.state.directory_mut().set_error();
            }
        }
    }

    fn select_highlighted_chat(&mut self) {
        let Some(chat) = self.state.directory().selected_chat() else {
            return;
        };
        let (chat_id, chat_name) = (chat.chat_id, chat.name.clone());
        self.select_chat(chat_id, chat_name);
    }

    fn open_latest_image(&mut self) {
        let target = self
            .state
            .log()
            .latest_image_ref()
            .map(|image_ref| format!("{}{}", self.asset_base_url, image_ref));

        match target {
            Some(target) => {
                if self.opener.open(&target).is_err() {
                    self.state
                        .set_status(NoteKind::Error, "Failed to open image viewer");
                }
            }
            None => {
                self.state
                    .set_status(NoteKind::Info, "No image in this conversation");
            }
        }
    }

    fn start_new_chat_prompt(&mut self) {
        match self.api.list_users() {
            Ok(users) => {
                self.state.set_new_chat(Some(NewChatPrompt {
                    stage: PromptStage::ChatName,
                    input: Default::default(),
                    users,
                }));
                self.state.clear_status();
            }
            Err(error) => {
                self.state.set_status(
                    NoteKind::Error,
                    format!("Failed to load users: {:?}", error),
                );
            }
        }
    }

    fn handle_prompt_key(&mut self, key: &KeyInput) {
        if key.key == "esc" {
            self.state.set_new_chat(None);
            self.state.clear_status();
            return;
        }

        let Some(prompt) = self.state.new_chat_mut() else {
            return;
        };

        match key.key.as_str() {
            "backspace" => prompt.input.delete_char_before(),
            "left" => prompt.input.move_cursor_left(),
            "right" => prompt.input.move_cursor_right(),
            "enter" => self.advance_prompt(),
            key_name => {
                if let Some(ch) = single_char(key_name) {
                    prompt.input.insert_char(ch);
                }
            }
        }
    }

    fn advance_prompt(&mut self) {
        let Some(prompt) = self.state.new_chat_mut() else {
            return;
        };

        match prompt.stage.clone() {
            PromptStage::ChatName => {
                let name = prompt.input.take();
                if name.trim().is_empty() {
                    self.state
                        .set_status(NoteKind::Error, "Chat name must not be empty");
                    return;
                }
                prompt.stage = PromptStage::Participants { name };
            }
            PromptStage::Participants { name } => {
                let raw = prompt.input.take();
                let participants = match parse_participant_ids(&raw) {
                    Ok(ids) => ids,
                    Err(invalid) => {
                        self.state.set_status(
                            NoteKind::Error,
                            format!("Not a user id: {invalid}"),
                        );
                        if let Some(prompt) = self.state.new_chat_mut() {
                            prompt.input.set_text(raw);
                        }
                        return;
                    }
                };

                match create_chat(&self.api, CreateChatCommand { name, participants }) {
                    Ok(()) => {
                        self.state.set_new_chat(None);
                        self.refresh_directory();
                        self.state.set_status(NoteKind::Info, "Chat created");
                    }
                    Err(error) => {
                        self.state.set_new_chat(None);
                        self.state
                            .set_status(NoteKind::Error, create_error_text(&error));
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyInput) {
        if self.state.new_chat().is_some() {
            self.handle_prompt_key(&key);
            return;
        }

        if self.state.pending_delete() {
            self.resolve_pending_delete(&key);
            return;
        }

        if key.ctrl {
            match key.key.as_str() {
                "n" => self.start_new_chat_prompt(),
                "d" => self.request_delete(),
                "o" => self.open_latest_image(),
                "r" => self.refresh_directory(),
                _ => {}
            }
            return;
        }

        if key.key == "tab" {
            let next = match self.state.focus() {
                PaneFocus::Directory => PaneFocus::Filter,
                PaneFocus::Filter => PaneFocus::Composer,
                PaneFocus::Composer => PaneFocus::Directory,
            };
            self.state.set_focus(next);
            return;
        }

        match self.state.focus() {
            PaneFocus::Directory => self.handle_directory_key(&key),
            PaneFocus::Filter => self.handle_filter_key(&key),
            PaneFocus::Composer => self.handle_composer_key(&key),
        }
    }

    fn handle_directory_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.state.directory_mut().select_next(),
            "k" | "up" => self.state.directory_mut().select_previous(),
            "enter" => self.select_highlighted_chat(),
            "/" => self.state.set_focus(PaneFocus::Filter),
            "i" => {
                if self.state.session().is_some() {
                    self.state.set_focus(PaneFocus::Composer);
                }
            }
            "q" => self.teardown(),
            _ => {}
        }
    }

    /// Every filter keystroke issues a directory request, matching the
    /// search-as-you-type contract.
    // TODO: debounce these requests the way presence activity is debounced.
    fn handle_filter_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "esc" | "enter" => self.state.set_focus(PaneFocus::Directory),
            "backspace" => {
                self.state.filter_input_mut().delete_char_before();
                self.refresh_directory();
            }
            "left" => self.state.filter_input_mut().move_cursor_left(),
            "right" => self.state.filter_input_mut().move_cursor_right(),
            key_name => {
                if let Some(ch) = single_char(key_name) {
                    self.state.filter_input_mut().insert_char(ch);
                    self.refresh_directory();
                }
            }
        }
    }

    fn handle_composer_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "esc" => self.state.set_focus(PaneFocus::Directory),
            "enter" => self.send_composed_message(),
            "backspace" => self.state.composer_mut().delete_char_before(),
            "left" => self.state.composer_mut().move_cursor_left(),
            "right" => self.state.composer_mut().move_cursor_right(),
            key_name => {
                if let Some(ch) = single_char(key_name) {
                    self.state.composer_mut().insert_char(ch);
                }
            }
        }
    }

    /// Stops polling and halts the shell. The durable session slot is left
    /// intact so the next launch can restore it.
    fn teardown(&mut self) {
        if self.poller.is_running() {
            self.poller.stop();
        }
        self.state.stop();
    }
}

impl<A, S, P, N, O> ShellOrchestrator for SyncController<A, S, P, N, O>
where
    A: SyncApi,
    S: ActiveChatSink,
    P: PollDriver,
    N: Notifier,
    O: ExternalOpener,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick | AppEvent::FocusRegained => {}
            AppEvent::QuitRequested => self.teardown(),
            AppEvent::InputKey(key) => self.handle_key(key),
            AppEvent::Poll(snapshot) => self.apply_poll(snapshot),
            AppEvent::PasteImage(path) => self.send_pasted_image(path),
        }

        Ok(())
    }
}

fn header_from_info(info: &ChatInfo) -> ChatHeader {
    if info.is_group {
        ChatHeader::Group {
            name: info.name.clone(),
            participant_count: info.participant_count,
            participant_names: info.participant_names(),
        }
    } else {
        ChatHeader::Individual {
            name: info.name.clone(),
            is_online: info
                .other_user
                .as_ref()
                .map(|user| user.is_online)
                .unwrap_or(false),
        }
    }
}

fn single_char(key_name: &str) -> Option<char> {
    let mut chars = key_name.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

fn parse_participant_ids(raw: &str) -> Result<Vec<i64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().map_err(|_| part.to_owned()))
        .collect()
}

fn send_error_text(error: &SendMessageError) -> String {
    match error {
        SendMessageError::Rejected { message } => message.clone(),
        SendMessageError::Unauthorized => "Not authenticated".to_owned(),
        SendMessageError::ChatNotFound => "Chat no longer exists".to_owned(),
        SendMessageError::TemporarilyUnavailable => "Server unavailable, try again".to_owned(),
        SendMessageError::EmptyMessage => "Message is empty".to_owned(),
    }
}

fn send_image_error_text(error: &SendImageError) -> String {
    match error {
        SendImageError::Rejected { message } => message.clone(),
        SendImageError::Unreadable { path } => format!("Cannot read {path}"),
        SendImageError::NotAnImage { path } => format!("Not an image file: {path}"),
        SendImageError::Unauthorized => "Not authenticated".to_owned(),
        SendImageError::TemporarilyUnavailable => "Server unavailable, try again".to_owned(),
    }
}

fn delete_error_text(error: &DeleteChatError) -> String {
    match error {
        DeleteChatError::Rejected { message } => message.clone(),
        DeleteChatError::Unauthorized => "Not authenticated".to_owned(),
        DeleteChatError::TemporarilyUnavailable => "Server unavailable, try again".to_owned(),
    }
}

fn create_error_text(error: &CreateChatError) -> String {
    match error {
        CreateChatError::Rejected { message } => message.clone(),
        CreateChatError::EmptyName => "Chat name must not be empty".to_owned(),
        CreateChatError::NoParticipants => "Pick at least one participant".to_owned(),
        CreateChatError::Unauthorized => "Not authenticated".to_owned(),
        CreateChatError::TemporarilyUnavailable => "Server unavailable, try again".to_owned(),
    }
}
