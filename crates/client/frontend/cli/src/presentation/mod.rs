//! Terminal rendering: setup, layout, styling, and widgets.

pub mod terminal;
pub mod theme;
pub mod ui;
pub mod widgets;
