//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for chat name in the directory (bold, bright).
pub fn chat_name_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for message preview text (dimmed).
pub fn chat_preview_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn presence_online_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn presence_offline_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for timestamp columns.
pub fn timestamp_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for message author name (white, bold).
pub fn message_author_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for the local user's own messages.
pub fn own_message_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Style for image references like [Image].
pub fn image_ref_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn date_separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn status_info_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn status_error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
