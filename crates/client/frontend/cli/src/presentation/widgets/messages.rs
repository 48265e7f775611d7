//! Messages widget displaying recent session and transaction events.

use kot_frontend_core::MessageEntry;
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, List, ListDirection, ListItem},
};

use crate::presentation::theme::RatatuiTheme;

/// Render the message log panel.
///
/// `messages` is newest first and is drawn bottom to top, so the newest line
/// sits at the bottom.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    messages: &[MessageEntry],
    capacity: usize,
    theme: &RatatuiTheme,
) {
    let mut items: Vec<ListItem> = messages
        .iter()
        .map(|entry| ListItem::new(format_message(entry)).style(theme.style_message(entry.level)))
        .collect();

    // Pad with empty lines to maintain consistent height
    while items.len() < capacity {
        items.push(ListItem::new(""));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Messages"))
        .direction(ListDirection::BottomToTop);

    frame.render_widget(list, area);
}

/// Format a message entry with its explorer link, if any.
fn format_message(entry: &MessageEntry) -> String {
    match &entry.link {
        Some(link) => format!("{} ({})", entry.text, link),
        None => entry.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_frontend_core::MessageLevel;

    #[test]
    fn links_follow_the_text() {
        let entry = MessageEntry::new("Domain minted!", MessageLevel::Success)
            .with_link(Some("https://mumbai.polygonscan.com/tx/0x01".into()));
        assert_eq!(
            format_message(&entry),
            "Domain minted! (https://mumbai.polygonscan.com/tx/0x01)"
        );
    }
}
