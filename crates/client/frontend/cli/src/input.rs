//! Input processing for the CLI client.
//!
//! This module owns the keyboard-to-command mapping so the rest of the
//! application can remain agnostic about concrete key bindings or the
//! specifics of `crossterm` events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::AppMode;

/// High-level outcome of processing a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    Connect,
    SwitchNetwork,
    OpenMintForm,
    EditSelected,
    Refresh,
    SelectNext,
    SelectPrev,
    /// Character typed into the focused form field.
    Input(char),
    Backspace,
    NextField,
    /// Send the current form to the runtime.
    Submit,
    ExitModal,
    /// No meaningful command was produced.
    None,
}

/// Translates `KeyEvent`s into commands depending on the current mode.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Converts a raw key event into a higher-level command.
    pub fn handle_key(&self, key: KeyEvent, mode: &AppMode) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match mode {
            AppMode::Normal => self.handle_normal(key),
            AppMode::MintForm | AppMode::Edit { .. } => self.handle_form(key),
        }
    }

    fn handle_normal(&self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Char(raw) => match raw.to_ascii_lowercase() {
                'q' => KeyAction::Quit,
                'c' => KeyAction::Connect,
                'n' => KeyAction::SwitchNetwork,
                'm' => KeyAction::OpenMintForm,
                'e' => KeyAction::EditSelected,
                'r' => KeyAction::Refresh,
                'j' => KeyAction::SelectNext,
                'k' => KeyAction::SelectPrev,
                _ => KeyAction::None,
            },
            KeyCode::Down => KeyAction::SelectNext,
            KeyCode::Up => KeyAction::SelectPrev,
            KeyCode::Enter => KeyAction::EditSelected,
            _ => KeyAction::None,
        }
    }

    fn handle_form(&self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Char(ch) => KeyAction::Input(ch),
            KeyCode::Backspace => KeyAction::Backspace,
            KeyCode::Tab | KeyCode::BackTab => KeyAction::NextField,
            KeyCode::Enter => KeyAction::Submit,
            KeyCode::Esc => KeyAction::ExitModal,
            _ => KeyAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn maps_normal_commands() {
        let handler = InputHandler::new();
        let mode = AppMode::Normal;
        assert_eq!(handler.handle_key(key(KeyCode::Char('c')), &mode), KeyAction::Connect);
        assert_eq!(handler.handle_key(key(KeyCode::Char('N')), &mode), KeyAction::SwitchNetwork);
        assert_eq!(handler.handle_key(key(KeyCode::Char('m')), &mode), KeyAction::OpenMintForm);
        assert_eq!(handler.handle_key(key(KeyCode::Down), &mode), KeyAction::SelectNext);
        assert_eq!(handler.handle_key(key(KeyCode::Char('q')), &mode), KeyAction::Quit);
    }

    #[test]
    fn form_captures_letters() {
        let handler = InputHandler::new();
        let mode = AppMode::MintForm;
        assert_eq!(handler.handle_key(key(KeyCode::Char('q')), &mode), KeyAction::Input('q'));
        assert_eq!(handler.handle_key(key(KeyCode::Enter), &mode), KeyAction::Submit);
        assert_eq!(handler.handle_key(key(KeyCode::Esc), &mode), KeyAction::ExitModal);
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let handler = InputHandler::new();
        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        let edit = AppMode::Edit { name: "abc".into() };
        assert_eq!(handler.handle_key(ctrl_c, &edit), KeyAction::Quit);
        assert_eq!(handler.handle_key(ctrl_c, &AppMode::Normal), KeyAction::Quit);
    }

    #[test]
    fn ignores_unknown_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('x')), &AppMode::Normal),
            KeyAction::None
        );
    }
}
