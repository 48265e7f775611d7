//! Action panel: connection prompts, the mint/edit form, and pending transactions.

use kot_frontend_core::{ViewModel, format};
use kot_runtime::NetworkState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    presentation::theme::RatatuiTheme,
    state::{AppMode, AppState, FormField},
};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view_model: &ViewModel,
    app_state: &AppState,
    currency_symbol: &str,
    theme: &RatatuiTheme,
) {
    let (title, mut lines) = match &app_state.mode {
        AppMode::Normal => ("Session", prompt_lines(view_model, theme)),
        AppMode::MintForm => ("Mint a name", form_lines(app_state, currency_symbol, theme)),
        AppMode::Edit { .. } => ("Set record", form_lines(app_state, currency_symbol, theme)),
    };

    if let Some(pending) = &view_model.pending {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!("Pending {}: ", pending.stage),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format::short_hash(&pending.hash)),
        ]));
        if let Some(url) = &pending.explorer_url {
            lines.push(Line::styled(url.clone(), theme.style_hint()));
        }
    }

    let unrecorded = view_model.unrecorded_names();
    if !unrecorded.is_empty() && app_state.mode == AppMode::Normal {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!(
                "No record yet: {}. Select one and press e.",
                unrecorded
                    .iter()
                    .map(|name| format!("{name}.kot"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(paragraph, area);
}

/// What the user should do next in normal mode.
fn prompt_lines(view_model: &ViewModel, theme: &RatatuiTheme) -> Vec<Line<'static>> {
    let target = view_model
        .session
        .as_ref()
        .map(|s| s.target_network.to_string())
        .unwrap_or_default();

    let text = if !view_model.provider_available() {
        "No wallet found. Get MetaMask -> https://metamask.io/".to_string()
    } else if !view_model.is_connected() {
        "Press c to connect your wallet.".to_string()
    } else {
        match view_model.network_state() {
            NetworkState::Ready => "Press m to mint a name.".to_string(),
            NetworkState::WrongNetwork | NetworkState::Unknown => {
                format!("Please connect to the {target}. Press n to switch.")
            }
        }
    };

    vec![Line::styled(text, theme.style_network(view_model.network_state()))]
}

fn form_lines(app_state: &AppState, currency_symbol: &str, theme: &RatatuiTheme) -> Vec<Line<'static>> {
    let focused = app_state.focused_field();
    let editing = matches!(app_state.mode, AppMode::Edit { .. });

    let price = if editing {
        Span::raw("")
    } else {
        match format::price_preview(app_state.form_name(), currency_symbol) {
            Some(label) => Span::styled(format!("  {label}"), Style::default().fg(Color::LightGreen)),
            None => Span::styled("  (3+ characters)", theme.style_hint()),
        }
    };

    vec![
        Line::from(vec![
            Span::raw("Name:   "),
            field(app_state.form_name(), focused == FormField::Name && !editing),
            Span::raw(".kot"),
            price,
        ]),
        Line::from(vec![
            Span::raw("Record: "),
            field(&app_state.record_input, focused == FormField::Record),
        ]),
    ]
}

fn field(value: &str, focused: bool) -> Span<'static> {
    if focused {
        Span::styled(
            format!("{value}_"),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::UNDERLINED),
        )
    } else {
        Span::raw(value.to_string())
    }
}
