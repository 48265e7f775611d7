//! Footer widget displaying context-sensitive key bindings.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::{AppMode, AppState};

/// Render the footer panel with key bindings help.
pub fn render(frame: &mut Frame, area: Rect, app_state: &AppState) {
    let text = match &app_state.mode {
        AppMode::Normal => vec![Line::from(vec![
            Span::raw("[c] Connect | "),
            Span::raw("[n] Switch network | "),
            Span::raw("[m] Mint | "),
            Span::raw("[j/k/Arrows] Select | "),
            Span::raw("[e/Enter] Edit | "),
            Span::raw("[r] Refresh | "),
            Span::raw("[q] Quit"),
        ])],
        AppMode::MintForm => vec![Line::from(vec![
            Span::raw("[Tab] Next field | "),
            Span::raw("[Enter] Mint | "),
            Span::raw("[ESC] Back"),
        ])],
        AppMode::Edit { name } => vec![Line::from(vec![
            Span::raw(format!("[EDIT {name}.kot] ")),
            Span::raw("[Enter] Set record | "),
            Span::raw("[ESC] Cancel"),
        ])],
    };

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
