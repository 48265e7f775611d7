//! Header widget displaying account, network, and workflow status.

use kot_frontend_core::{ViewModel, format};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::presentation::theme::RatatuiTheme;

/// Render the header panel.
pub fn render(frame: &mut Frame, area: Rect, view_model: &ViewModel, theme: &RatatuiTheme) {
    let account = match view_model.account() {
        Some(account) => Span::styled(
            format::short_address(&account),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        None if view_model.provider_available() => {
            Span::styled("not connected", theme.style_hint())
        }
        None => Span::styled("no wallet", Style::default().fg(Color::LightRed)),
    };

    let state = view_model.network_state();
    let network = view_model.session.as_ref().and_then(|s| s.network);
    let status = view_model.status();

    let text = vec![Line::from(vec![
        Span::raw("Wallet: "),
        account,
        Span::raw(" | Network: "),
        Span::styled(format::network_label(network, state), theme.style_network(state)),
        Span::raw(" | Status: "),
        Span::styled(format::status_label(status), theme.style_status(status)),
    ])];

    let paragraph =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(".kot names"));

    frame.render_widget(paragraph, area);
}
