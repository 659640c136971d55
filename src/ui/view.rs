use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{
    chat::ChatSummary,
    chat_directory::DirectoryUiState,
    message::is_image_ref,
    message_log::{
        build_log_entries, sanitize_text, LogAlignment, LogContent, LogEntry, LogUiState,
    },
    shell_state::{
        ChatHeader, NewChatPrompt, NoteKind, PaneFocus, PromptStage, ShellState,
    },
};

use super::{message_input::render_input_field, styles};

const HELP_LINE: &str =
    "tab: focus  /: search  i: compose  ctrl+n: new  ctrl+d: delete  ctrl+o: image  q: quit";

pub fn render(frame: &mut Frame<'_>, state: &ShellState) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let [sidebar_area, conversation_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .areas(content_area);

    let [filter_area, directory_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .areas(sidebar_area);

    render_input_field(
        frame,
        filter_area,
        "Search",
        state.filter_input(),
        "Filter chats...",
        state.focus() == PaneFocus::Filter,
    );
    render_directory_panel(frame, directory_area, state);

    if let Some(prompt) = state.new_chat() {
        render_new_chat_panel(frame, conversation_area, prompt);
    } else {
        let [header_area, log_area, composer_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .areas(conversation_area);

        render_header(frame, header_area, state.header());
        render_log_panel(frame, log_area, state);

        let composer_placeholder = if state.session().is_some() {
            "Press 'i' to type a message..."
        } else {
            "Select a chat to start messaging"
        };
        render_input_field(
            frame,
            composer_area,
            "Message",
            state.composer(),
            composer_placeholder,
            state.focus() == PaneFocus::Composer,
        );
    }

    render_status_line(frame, status_area, state);
}

fn render_directory_panel(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let is_active = state.focus() == PaneFocus::Directory;
    let border_style = if is_active {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let directory = state.directory();
    match directory.ui_state() {
        DirectoryUiState::Loading => {
            render_directory_message(frame, area, "Loading chats...", border_style)
        }
        DirectoryUiState::Empty => {
            render_directory_message(frame, area, "No chats found.", border_style)
        }
        DirectoryUiState::Error => render_directory_message(
            frame,
            area,
            "Failed to load chats. Check connection and retry.",
            border_style,
        ),
        DirectoryUiState::Ready => {
            let chats = directory.chats();
            let inner_width = area.width.saturating_sub(2) as usize;
            let items: Vec<ListItem<'static>> = chats
                .iter()
                .map(|chat| directory_item(chat, inner_width))
                .collect();

            let title = format!("Chats ({})", chats.len());
            let list = List::new(items)
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_style(border_style),
                )
                .highlight_style(
                    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
                );

            let mut list_state = ListState::default();
            list_state.select(directory.selected_index());
            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn render_directory_message(
    frame: &mut Frame<'_>,
    area: Rect,
    message: &str,
    border_style: Style,
) {
    let message = Paragraph::new(message).block(
        Block::default()
            .title("Chats")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(message, area);
}

fn directory_item(chat: &ChatSummary, inner_width: usize) -> ListItem<'static> {
    let marker = identity_marker(chat);
    let name = sanitize_text(&chat.name);
    let time = chat
        .last_message
        .as_ref()
        .map(|preview| preview.timestamp.clone())
        .unwrap_or_default();

    let used = marker.content.width() + name.width() + time.width();
    let padding = inner_width.saturating_sub(used).max(1);
    let first_line = Line::from(vec![
        marker,
        Span::styled(name, styles::chat_name_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(time, styles::timestamp_style()),
    ]);

    let preview = preview_line(chat);
    let second_line = Line::from(vec![
        Span::raw("  ".to_owned()),
        Span::styled(
            truncate_to_width(&preview, inner_width.saturating_sub(2)),
            styles::chat_preview_style(),
        ),
    ]);

    ListItem::new(vec![first_line, second_line])
}

/// Group collage replacement: participant count for groups, a presence dot
/// for one-to-one chats.
fn identity_marker(chat: &ChatSummary) -> Span<'static> {
    if chat.is_group {
        let count = chat
            .group_info
            .as_ref()
            .map(|info| info.participant_count)
            .unwrap_or_default();
        Span::styled(format!("[{count}] "), styles::chat_preview_style())
    } else if chat
        .other_user
        .as_ref()
        .map(|user| user.is_online)
        .unwrap_or(false)
    {
        Span::styled("● ".to_owned(), styles::presence_online_style())
    } else {
        Span::styled("○ ".to_owned(), styles::presence_offline_style())
    }
}

/// Single-line preview, author-prefixed for group chats. Groups without a
/// last message fall back to their participant names.
fn preview_line(chat: &ChatSummary) -> String {
    let Some(preview) = &chat.last_message else {
        if let Some(group) = chat.group_info.as_ref().filter(|_| chat.is_group) {
            return group
                .participants
                .iter()
                .map(|p| sanitize_text(&p.name))
                .collect::<Vec<_>>()
                .join(", ");
        }
        return String::new();
    };

    let body = if is_image_ref(&preview.content) {
        "[Image]".to_owned()
    } else {
        sanitize_text(&preview.content)
    };

    if chat.is_group {
        format!("{}: {}", sanitize_text(&preview.author_name), body)
    } else {
        body
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, header: &ChatHeader) {
    let line = match header {
        ChatHeader::None => Line::from(vec![
            Span::styled("Select a chat".to_owned(), styles::chat_name_style()),
            Span::styled(" · no active chat".to_owned(), styles::chat_preview_style()),
        ]),
        ChatHeader::Individual { name, is_online } => {
            let (status, style) = if *is_online {
                ("online", styles::presence_online_style())
            } else {
                ("offline", styles::presence_offline_style())
            };
            Line::from(vec![
                Span::styled(sanitize_text(name), styles::chat_name_style()),
                Span::raw(" · ".to_owned()),
                Span::styled(status.to_owned(), style),
            ])
        }
        ChatHeader::Group {
            name,
            participant_count,
            participant_names,
        } => Line::from(vec![
            Span::styled(sanitize_text(name), styles::chat_name_style()),
            Span::styled(
                format!(
                    " · {participant_count} participants · {}",
                    sanitize_text(participant_names)
                ),
                styles::chat_preview_style(),
            ),
        ]),
    };

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_log_panel(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let block = Block::default().title("Messages").borders(Borders::ALL);

    let lines = match state.log().ui_state() {
        LogUiState::Empty => vec![Line::raw("Select a chat to start")],
        LogUiState::Loading => vec![Line::raw("Loading messages...")],
        LogUiState::Error => vec![Line::raw("Failed to load messages. Retrying...")],
        LogUiState::Ready => {
            let is_group = state
                .session()
                .map(|session| session.is_group)
                .unwrap_or(false);
            log_lines(state, is_group)
        }
    };

    // The only scroll policy is bottom-pinned: after every replace the view
    // shows the newest messages.
    let inner_height = area.height.saturating_sub(2) as usize;
    let offset = lines.len().saturating_sub(inner_height) as u16;
    let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

fn log_lines(state: &ShellState, is_group: bool) -> Vec<Line<'static>> {
    let entries = build_log_entries(state.log().messages(), state.local_user_id(), is_group);
    let mut lines = Vec::new();

    for entry in entries {
        match entry {
            LogEntry::DateSeparator(date) => {
                lines.push(
                    Line::from(vec![Span::styled(
                        format!("─── {date} ───"),
                        styles::date_separator_style(),
                    )])
                    .alignment(Alignment::Center),
                );
            }
            LogEntry::Message(message) => {
                let alignment = match message.alignment {
                    LogAlignment::Left => Alignment::Left,
                    LogAlignment::Right => Alignment::Right,
                };

                if let Some(author) = &message.author_label {
                    lines.push(
                        Line::from(vec![Span::styled(
                            format!("{author}:"),
                            styles::message_author_style(),
                        )])
                        .alignment(alignment),
                    );
                }

                let text_style = match message.alignment {
                    LogAlignment::Right => styles::own_message_style(),
                    LogAlignment::Left => styles::message_text_style(),
                };

                let avatar_prefix = message.avatar_ref.as_ref().map(|_| "◦ ");

                match &message.content {
                    LogContent::ImageRef(reference) => {
                        let mut spans = prefixed_spans(avatar_prefix, &message.time);
                        spans.push(Span::styled(
                            format!("[Image] {reference}"),
                            styles::image_ref_style(),
                        ));
                        lines.push(Line::from(spans).alignment(alignment));
                    }
                    LogContent::Text(text) => {
                        let mut text_lines = text.lines();
                        let first = text_lines.next().unwrap_or_default();
                        let mut spans = prefixed_spans(avatar_prefix, &message.time);
                        spans.push(Span::styled(first.to_owned(), text_style));
                        lines.push(Line::from(spans).alignment(alignment));

                        for continuation in text_lines {
                            lines.push(
                                Line::from(vec![Span::styled(
                                    continuation.to_owned(),
                                    text_style,
                                )])
                                .alignment(alignment),
                            );
                        }
                    }
                }
            }
        }
    }

    lines
}

fn prefixed_spans(avatar_prefix: Option<&'static str>, time: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if let Some(prefix) = avatar_prefix {
        spans.push(Span::styled(
            prefix.to_owned(),
            styles::presence_offline_style(),
        ));
    }
    spans.push(Span::styled(
        format!("{time} "),
        styles::timestamp_style(),
    ));
    spans
}

fn render_new_chat_panel(frame: &mut Frame<'_>, area: Rect, prompt: &NewChatPrompt) {
    let mut lines = Vec::new();

    match &prompt.stage {
        PromptStage::ChatName => {
            lines.push(Line::raw("Chat name:"));
        }
        PromptStage::Participants { name } => {
            lines.push(Line::raw(format!("Chat name: {name}")));
            lines.push(Line::raw("Participant user ids (comma-separated):"));
        }
    }

    lines.push(Line::from(vec![
        Span::styled("> ".to_owned(), styles::input_prompt_style()),
        Span::styled(prompt.input.text().to_owned(), styles::input_text_style()),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::styled("Users:", styles::chat_preview_style()));
    for user in &prompt.users {
        lines.push(Line::styled(
            format!("  {}  {}", user.user_id, sanitize_text(&user.name)),
            styles::chat_preview_style(),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "enter: confirm  esc: cancel",
        styles::status_info_style(),
    ));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title("New chat")
            .borders(Borders::ALL)
            .border_style(styles::active_panel_border_style()),
    );
    frame.render_widget(paragraph, area);
}

fn render_status_line(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let line = if let Some(note) = state.status() {
        let style = match note.kind {
            NoteKind::Info => styles::status_info_style(),
            NoteKind::Error => styles::status_error_style(),
        };
        Line::from(vec![Span::styled(sanitize_text(&note.text), style)])
    } else if let Some(notification) = state.last_notification() {
        let text = if notification.is_image {
            format!("New image in {}", sanitize_text(&notification.chat_name))
        } else {
            format!(
                "New message in {}: {}",
                sanitize_text(&notification.chat_name),
                truncate_to_width(&sanitize_text(&notification.preview), 60)
            )
        };
        Line::from(vec![Span::styled(text, styles::status_info_style())])
    } else {
        Line::from(vec![Span::styled(
            HELP_LINE.to_owned(),
            styles::status_info_style(),
        )])
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > max_width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{GroupInfo, MessagePreview, OtherUser};

    fn chat(name: &str) -> ChatSummary {
        ChatSummary {
            chat_id: 1,
            name: name.to_owned(),
            is_group: false,
            other_user: None,
            group_info: None,
            last_message: None,
        }
    }

    #[test]
    fn group_preview_is_prefixed_with_author_name() {
        let mut summary = chat("Ops");
        summary.is_group = true;
        summary.last_message = Some(MessagePreview {
            content: "hola".to_owned(),
            timestamp: "12:30".to_owned(),
            author_name: "Ana".to_owned(),
        });

        assert_eq!(preview_line(&summary), "Ana: hola");
    }

    #[test]
    fn one_to_one_preview_has_no_author_prefix() {
        let mut summary = chat("Ana");
        summary.last_message = Some(MessagePreview {
            content: "hola".to_owned(),
            timestamp: "12:30".to_owned(),
            author_name: "Ana".to_owned(),
        });

        assert_eq!(preview_line(&summary), "hola");
    }

    #[test]
    fn image_previews_are_masked() {
        let mut summary = chat("Ana");
        summary.last_message = Some(MessagePreview {
            content: "/static/uploads/pic.png".to_owned(),
            timestamp: "12:30".to_owned(),
            author_name: "Ana".to_owned(),
        });

        assert_eq!(preview_line(&summary), "[Image]");
    }

    #[test]
    fn identity_marker_shows_participant_count_for_groups() {
        let mut summary = chat("Ops");
        summary.is_group = true;
        summary.group_info = Some(GroupInfo {
            participant_count: 4,
            participants: vec![],
        });

        assert_eq!(identity_marker(&summary).content.as_ref(), "[4] ");
    }

    #[test]
    fn identity_marker_shows_presence_dot_for_one_to_one() {
        let mut summary = chat("Ana");
        summary.other_user = Some(OtherUser {
            user_id: 2,
            name: "Ana".to_owned(),
            avatar_ref: None,
            is_online: true,
        });

        assert_eq!(identity_marker(&summary).content.as_ref(), "● ");
    }

    #[test]
    fn truncation_appends_an_ellipsis() {
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("short", 10), "short");
    }
}
