//! UI rendering composing all widgets from the ViewModel.
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::{
    config::UiConfig,
    presentation::{terminal::Tui, theme::RatatuiTheme, widgets},
    state::AppState,
};
use kot_frontend_core::{MessageLog, ViewModel};

/// Rendering context containing all state and configuration needed for UI rendering.
pub struct RenderContext<'a> {
    pub view_model: &'a ViewModel,
    pub messages: &'a MessageLog,
    pub app_state: &'a AppState,
    pub ui: &'a UiConfig,
}

/// Render the terminal UI.
///
/// Layout, top to bottom: session header, listing beside the action panel,
/// messages, key bindings.
pub fn render_with_view_model(terminal: &mut Tui, ctx: &RenderContext) -> Result<()> {
    let theme = RatatuiTheme::new();

    terminal.draw(|frame| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                           // Header
                Constraint::Min(6),                              // Listing | Panel
                Constraint::Length(ctx.ui.message_panel_height), // Messages
                Constraint::Length(3),                           // Footer
            ])
            .split(frame.area());

        widgets::header::render(frame, chunks[0], ctx.view_model, &theme);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        widgets::listing::render(frame, body[0], ctx.view_model, ctx.app_state, &theme);
        widgets::panel::render(
            frame,
            body[1],
            ctx.view_model,
            ctx.app_state,
            &ctx.ui.currency_symbol,
            &theme,
        );

        let capacity = ctx.ui.message_panel_height.saturating_sub(2) as usize;
        let recent: Vec<_> = ctx.messages.recent(capacity).cloned().collect();
        widgets::messages::render(frame, chunks[2], &recent, capacity, &theme);

        widgets::footer::render(frame, chunks[3], ctx.app_state);
    })?;

    Ok(())
}
