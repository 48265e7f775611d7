//! Ratatui styling for session state and messages.

use kot_frontend_core::MessageLevel;
use kot_runtime::{NetworkState, WorkflowStatus};
use ratatui::style::{Color, Modifier, Style};

/// Color scheme shared by every widget.
#[derive(Clone, Copy, Debug, Default)]
pub struct RatatuiTheme;

impl RatatuiTheme {
    pub fn new() -> Self {
        Self
    }

    pub fn style_message(&self, level: MessageLevel) -> Style {
        match level {
            MessageLevel::Info => Style::default().fg(Color::White),
            MessageLevel::Success => Style::default().fg(Color::LightGreen),
            MessageLevel::Warning => Style::default().fg(Color::Yellow),
            MessageLevel::Error => Style::default().fg(Color::LightRed),
        }
    }

    pub fn style_network(&self, state: NetworkState) -> Style {
        let color = match state {
            NetworkState::Ready => Color::LightGreen,
            NetworkState::WrongNetwork => Color::LightRed,
            NetworkState::Unknown => Color::DarkGray,
        };
        Style::default().fg(color)
    }

    pub fn style_status(&self, status: WorkflowStatus) -> Style {
        let style = match status {
            WorkflowStatus::Idle => Style::default().fg(Color::Gray),
            WorkflowStatus::Submitting | WorkflowStatus::AwaitingConfirmation => {
                Style::default().fg(Color::Yellow)
            }
            WorkflowStatus::Succeeded => Style::default().fg(Color::LightGreen),
            WorkflowStatus::Failed => Style::default().fg(Color::LightRed),
        };
        if status.is_in_flight() {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn style_owned(&self) -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn style_selected(&self) -> Style {
        Style::default()
            .add_modifier(Modifier::REVERSED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_hint(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
