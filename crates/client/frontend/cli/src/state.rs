//! Application state for mode management and form input.

use kot_runtime::{MintRequest, WorkflowKind};

/// Top-level application mode determining input handling and UI layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the listing; single-key commands.
    Normal,
    /// Typing a new name and its record.
    MintForm,
    /// Replacing the record of an owned name.
    Edit { name: String },
}

impl AppMode {
    /// Workflow a submit in this mode starts.
    pub fn workflow_kind(&self) -> Option<WorkflowKind> {
        match self {
            AppMode::Normal => None,
            AppMode::MintForm => Some(WorkflowKind::Mint),
            AppMode::Edit { .. } => Some(WorkflowKind::UpdateRecord),
        }
    }
}

/// Form field receiving typed characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Record,
}

/// Mutable application state tracking mode, inputs, and listing selection.
#[derive(Clone, Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub name_input: String,
    pub record_input: String,
    pub focus: FormField,
    /// Index into the listing.
    pub selected: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Normal,
            name_input: String::new(),
            record_input: String::new(),
            focus: FormField::Name,
            selected: 0,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the mint form, keeping whatever was typed before.
    pub fn enter_mint_form(&mut self) {
        self.mode = AppMode::MintForm;
        self.focus = FormField::Name;
    }

    /// Enters edit mode with the name fixed and the record cleared.
    pub fn enter_edit(&mut self, name: impl Into<String>) {
        self.mode = AppMode::Edit { name: name.into() };
        self.record_input.clear();
        self.focus = FormField::Record;
    }

    pub fn exit_to_normal(&mut self) {
        self.mode = AppMode::Normal;
        self.focus = FormField::Name;
    }

    pub fn push_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        match self.focused_field() {
            FormField::Name => self.name_input.push(ch),
            FormField::Record => self.record_input.push(ch),
        }
    }

    pub fn pop_char(&mut self) {
        match self.focused_field() {
            FormField::Name => self.name_input.pop(),
            FormField::Record => self.record_input.pop(),
        };
    }

    /// Moves focus between name and record. The name is fixed while editing.
    pub fn next_field(&mut self) {
        if matches!(self.mode, AppMode::Edit { .. }) {
            return;
        }
        self.focus = match self.focus {
            FormField::Name => FormField::Record,
            FormField::Record => FormField::Name,
        };
    }

    pub fn focused_field(&self) -> FormField {
        match self.mode {
            AppMode::Edit { .. } => FormField::Record,
            _ => self.focus,
        }
    }

    /// Name the current form refers to.
    pub fn form_name(&self) -> &str {
        match &self.mode {
            AppMode::Edit { name } => name,
            _ => &self.name_input,
        }
    }

    /// Request for the current form, or `None` outside a form.
    pub fn request(&self) -> Option<(WorkflowKind, MintRequest)> {
        let kind = self.mode.workflow_kind()?;
        Some((
            kind,
            MintRequest::new(self.form_name(), self.record_input.as_str()),
        ))
    }

    /// A workflow finished successfully: drop the typed request and leave the form.
    pub fn complete(&mut self, kind: WorkflowKind) {
        if self.mode.workflow_kind() != Some(kind) {
            return;
        }
        self.name_input.clear();
        self.record_input.clear();
        self.exit_to_normal();
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps the selection inside a listing of `len` entries.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_normal() {
        let state = AppState::new();
        assert_eq!(state.mode, AppMode::Normal);
        assert!(state.request().is_none());
    }

    #[test]
    fn typing_follows_focus() {
        let mut state = AppState::new();
        state.enter_mint_form();
        for ch in "abc".chars() {
            state.push_char(ch);
        }
        state.next_field();
        for ch in "@kot".chars() {
            state.push_char(ch);
        }
        state.pop_char();

        let (kind, request) = state.request().unwrap();
        assert_eq!(kind, WorkflowKind::Mint);
        assert_eq!(request.name, "abc");
        assert_eq!(request.record, "@ko");
    }

    #[test]
    fn edit_prefills_name_and_locks_it() {
        let mut state = AppState::new();
        state.name_input = "draft".into();
        state.record_input = "old".into();
        state.enter_edit("alice");
        state.next_field();
        state.push_char('x');

        assert_eq!(state.focused_field(), FormField::Record);
        let (kind, request) = state.request().unwrap();
        assert_eq!(kind, WorkflowKind::UpdateRecord);
        assert_eq!(request.name, "alice");
        assert_eq!(request.record, "x");
        assert_eq!(state.name_input, "draft");
    }

    #[test]
    fn completion_clears_only_the_matching_form() {
        let mut state = AppState::new();
        state.enter_mint_form();
        state.push_char('a');

        state.complete(WorkflowKind::UpdateRecord);
        assert_eq!(state.mode, AppMode::MintForm);

        state.complete(WorkflowKind::Mint);
        assert_eq!(state.mode, AppMode::Normal);
        assert!(state.name_input.is_empty());
    }

    #[test]
    fn leaving_the_form_keeps_the_draft() {
        let mut state = AppState::new();
        state.enter_mint_form();
        state.push_char('z');
        state.exit_to_normal();
        state.enter_mint_form();
        assert_eq!(state.name_input, "z");
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut state = AppState::new();
        state.select_next(2);
        state.select_next(2);
        assert_eq!(state.selected, 1);
        state.clamp_selection(0);
        assert_eq!(state.selected, 0);
        state.select_prev();
        assert_eq!(state.selected, 0);
    }
}
