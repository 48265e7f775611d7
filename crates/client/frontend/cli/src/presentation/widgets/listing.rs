//! Listing widget showing every registered name.

use kot_frontend_core::{ViewModel, format};
use kot_runtime::MintRecord;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{presentation::theme::RatatuiTheme, state::AppState};

/// Render the listing, or the reason it is hidden.
///
/// Names owned by the connected account are highlighted and marked
/// editable; the selection follows [`AppState::selected`].
pub fn render(
    frame: &mut Frame,
    area: Rect,
    view_model: &ViewModel,
    app_state: &AppState,
    theme: &RatatuiTheme,
) {
    let title = format!("Minted names ({})", view_model.records.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if !view_model.listing_visible() {
        let hint = Paragraph::new(Span::styled(
            "Connect to the target network to see minted names.",
            theme.style_hint(),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    if view_model.records.is_empty() {
        let text = match &view_model.listing_error {
            Some(error) => format!("Could not load names: {error}"),
            None => "No names yet. Press m to mint the first one.".to_string(),
        };
        let empty = Paragraph::new(Span::styled(text, theme.style_hint()))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = view_model
        .records
        .iter()
        .map(|record| ListItem::new(row(record, view_model.can_edit(record), theme)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.style_selected());

    let mut state = ListState::default().with_selected(Some(app_state.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn row(record: &MintRecord, editable: bool, theme: &RatatuiTheme) -> Line<'static> {
    let name_style = if editable {
        theme.style_owned()
    } else {
        Style::default()
    };
    let record_span = if record.has_record() {
        Span::raw(record.record.clone())
    } else {
        Span::styled("(no record)", theme.style_hint())
    };

    Line::from(vec![
        Span::styled(format!("{}.kot", record.name), name_style),
        Span::raw("  "),
        record_span,
        Span::raw("  "),
        Span::styled(format::short_address(&record.owner), theme.style_hint()),
        Span::raw(if editable { "  [e]" } else { "" }),
    ])
}
