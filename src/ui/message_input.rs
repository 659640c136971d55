//! Single-line input field rendering (composer, filter, prompts).

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::message_input_state::MessageInputState;

use super::styles;

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";

/// Renders an input field with a title, border focus highlight, and a
/// placeholder when empty and unfocused.
pub fn render_input_field(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    input_state: &MessageInputState,
    placeholder: &str,
    is_focused: bool,
) {
    let border_style = if is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let line = build_input_line(input_state, placeholder, is_focused);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(title.to_owned())
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(paragraph, area);

    if is_focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(input_state.cursor_position().min(u16::MAX as usize) as u16);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn build_input_line(
    input_state: &MessageInputState,
    placeholder: &str,
    is_focused: bool,
) -> Line<'static> {
    let prompt_style = styles::input_prompt_style();

    if !is_focused && input_state.is_empty() {
        return Line::from(vec![
            Span::styled(PROMPT_SYMBOL.to_owned(), prompt_style),
            Span::styled(placeholder.to_owned(), styles::input_placeholder_style()),
        ]);
    }

    Line::from(vec![
        Span::styled(PROMPT_SYMBOL.to_owned(), prompt_style),
        Span::styled(input_state.text().to_owned(), styles::input_text_style()),
    ])
}
