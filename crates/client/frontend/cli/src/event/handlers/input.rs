//! Input handling and command dispatch.

use std::future::Future;

use anyhow::Result;
use crossterm::event::{self as term_event, Event as TermEvent, KeyEvent, KeyEventKind};
use kot_frontend_core::{EventConsumer, MessageEntry, MessageLevel};
use kot_runtime::WorkflowKind;
use tokio::time::Duration;

use super::super::EventLoop;
use crate::{feedback::CommandFeedback, input::KeyAction, presentation::terminal::Tui};

impl EventLoop {
    /// Poll for keyboard input and handle UI interactions.
    pub(in crate::event) async fn handle_input_tick(&mut self, terminal: &mut Tui) -> Result<bool> {
        if !term_event::poll(Duration::from_millis(0))? {
            return Ok(false);
        }

        match term_event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key_press(key, terminal).await
            }
            TermEvent::Resize(_, _) => {
                self.render(terminal)?;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Handle key press and dispatch to appropriate handler.
    pub(in crate::event) async fn handle_key_press(
        &mut self,
        key: KeyEvent,
        terminal: &mut Tui,
    ) -> Result<bool> {
        match self.input.handle_key(key, &self.app_state.mode) {
            KeyAction::Quit => {
                self.consumer.message_log_mut().push_text("Quitting...");
                self.render(terminal)?;
                return Ok(true);
            }
            KeyAction::Connect => {
                let handle = self.handle.clone();
                self.spawn_command(async move { handle.connect().await }, CommandFeedback::Connect);
            }
            KeyAction::SwitchNetwork => {
                let handle = self.handle.clone();
                self.spawn_command(
                    async move { handle.switch_network().await },
                    CommandFeedback::SwitchNetwork,
                );
            }
            KeyAction::Refresh => {
                let handle = self.handle.clone();
                self.spawn_command(
                    async move { handle.refresh_listing().await },
                    CommandFeedback::Refresh,
                );
            }
            KeyAction::OpenMintForm => {
                if self.consumer.view().is_connected() {
                    self.app_state.enter_mint_form();
                } else {
                    self.notify("Connect a wallet first (press c)", MessageLevel::Warning);
                }
            }
            KeyAction::EditSelected => self.edit_selected(),
            KeyAction::SelectNext => {
                let len = self.consumer.view().records.len();
                self.app_state.select_next(len);
            }
            KeyAction::SelectPrev => self.app_state.select_prev(),
            KeyAction::Input(ch) => self.app_state.push_char(ch),
            KeyAction::Backspace => self.app_state.pop_char(),
            KeyAction::NextField => self.app_state.next_field(),
            KeyAction::Submit => self.submit(),
            KeyAction::ExitModal => self.app_state.exit_to_normal(),
            KeyAction::None => return Ok(false),
        }

        self.render(terminal)?;
        Ok(false)
    }

    fn edit_selected(&mut self) {
        let view = self.consumer.view();
        let Some(record) = view.records.get(self.app_state.selected) else {
            return;
        };

        if view.can_edit(record) {
            let name = record.name.clone();
            self.app_state.enter_edit(name);
        } else {
            let text = format!("Only the owner can edit {}.kot", record.name);
            self.notify(text, MessageLevel::Warning);
        }
    }

    /// Sends the form; the form stays open until the workflow completes.
    fn submit(&mut self) {
        let Some((kind, request)) = self.app_state.request() else {
            return;
        };

        let handle = self.handle.clone();
        match kind {
            WorkflowKind::Mint => self.spawn_command(
                async move { handle.mint(request).await },
                CommandFeedback::Workflow,
            ),
            WorkflowKind::UpdateRecord => self.spawn_command(
                async move { handle.update_record(request).await },
                CommandFeedback::Workflow,
            ),
        }
    }

    /// Runs a runtime request off the loop; wallet prompts can take minutes.
    fn spawn_command<F, T>(&self, request: F, wrap: fn(kot_runtime::Result<T>) -> CommandFeedback)
    where
        F: Future<Output = kot_runtime::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let feedback_tx = self.feedback_tx.clone();
        tokio::spawn(async move {
            let result = request.await;
            if feedback_tx.send(wrap(result)).is_err() {
                tracing::debug!("UI exited before command reply");
            }
        });
    }

    fn notify(&mut self, text: impl Into<String>, level: MessageLevel) {
        self.consumer
            .message_log_mut()
            .push(MessageEntry::new(text, level));
    }
}
