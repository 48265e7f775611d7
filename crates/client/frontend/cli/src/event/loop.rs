//! Event loop orchestrating runtime events, user input, and rendering.
//!
//! This module coordinates three main concerns:
//! - Runtime event consumption and ViewModel updates (via SessionConsumer)
//! - Keyboard input processing (commands and form editing)
//! - Replies of commands running in the background

use std::collections::HashMap;

use anyhow::Result;
use kot_runtime::{Event as RuntimeEvent, ListingEvent, RuntimeHandle, SessionEvent, Topic, WorkflowEvent};
use tokio::{
    sync::{broadcast, broadcast::error::RecvError, mpsc},
    time::{self, Duration},
};

use crate::{
    config::CliConfig, feedback::CommandFeedback, input::InputHandler,
    presentation::terminal::Tui, state::AppState,
};
use kot_frontend_core::{EventConsumer, SessionConsumer, ViewModel};

const FRAME_INTERVAL_MS: u64 = 16;

/// Event loop owning the consumer (view model plus message log) and UI state.
pub struct EventLoop {
    pub(crate) subscriptions: HashMap<Topic, broadcast::Receiver<RuntimeEvent>>,
    pub(crate) handle: RuntimeHandle,
    pub(crate) input: InputHandler,
    pub(crate) consumer: SessionConsumer,
    pub(crate) app_state: AppState,
    pub(crate) cli_config: CliConfig,
    /// Background commands report here so the loop never awaits a wallet prompt.
    pub(crate) feedback_tx: mpsc::UnboundedSender<CommandFeedback>,
    feedback_rx: mpsc::UnboundedReceiver<CommandFeedback>,
}

impl EventLoop {
    pub fn new(
        subscriptions: HashMap<Topic, broadcast::Receiver<RuntimeEvent>>,
        handle: RuntimeHandle,
        consumer: SessionConsumer,
        cli_config: CliConfig,
    ) -> Self {
        let (feedback_tx, feedback_rx) = mpsc::unbounded_channel();

        Self {
            subscriptions,
            handle,
            input: InputHandler::new(),
            consumer,
            app_state: AppState::new(),
            cli_config,
            feedback_tx,
            feedback_rx,
        }
    }

    pub async fn run(mut self, terminal: &mut Tui) -> Result<SessionConsumer> {
        self.render(terminal)?;

        let mut session_rx = self.subscriptions.remove(&Topic::Session);
        let mut workflow_rx = self.subscriptions.remove(&Topic::Workflow);
        let mut listing_rx = self.subscriptions.remove(&Topic::Listing);

        loop {
            tokio::select! {
                result = recv(&mut session_rx) => {
                    if self.handle_runtime_event(result, terminal).await? {
                        break;
                    }
                }
                result = recv(&mut workflow_rx) => {
                    if self.handle_runtime_event(result, terminal).await? {
                        break;
                    }
                }
                result = recv(&mut listing_rx) => {
                    if self.handle_runtime_event(result, terminal).await? {
                        break;
                    }
                }
                Some(feedback) = self.feedback_rx.recv() => {
                    self.handle_feedback(feedback, terminal)?;
                }
                _ = time::sleep(Duration::from_millis(FRAME_INTERVAL_MS)) => {
                    if self.handle_input_tick(terminal).await? {
                        break;
                    }
                }
            }
        }

        Ok(self.consumer)
    }

    /// Handle runtime event and update ViewModel incrementally.
    async fn handle_runtime_event(
        &mut self,
        result: Result<RuntimeEvent, RecvError>,
        terminal: &mut Tui,
    ) -> Result<bool> {
        match result {
            Ok(event) => {
                let impact = self.consumer.on_event(&event);
                let layout_changed = self.sync_app_state(&event);

                if impact.requires_redraw || layout_changed {
                    self.render(terminal)?;
                }
                Ok(false)
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Event stream closed");
                Ok(true)
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} stale events, resynchronizing", skipped);
                self.resync().await?;
                self.render(terminal)?;
                Ok(false)
            }
        }
    }

    /// Mode and selection changes driven by runtime events.
    fn sync_app_state(&mut self, event: &RuntimeEvent) -> bool {
        match event {
            RuntimeEvent::Workflow(WorkflowEvent::Completed(outcome)) => {
                self.app_state.complete(outcome.kind);
                true
            }
            RuntimeEvent::Session(SessionEvent::HardReset { .. }) => {
                // The edited name may not exist on the new chain.
                if self.app_state.mode.workflow_kind().is_some() {
                    self.app_state.exit_to_normal();
                }
                self.app_state.clamp_selection(0);
                true
            }
            RuntimeEvent::Listing(ListingEvent::Refreshed { records }) => {
                self.app_state.clamp_selection(records.len());
                true
            }
            _ => false,
        }
    }

    /// Rebuild the view from the worker's state after missed events.
    async fn resync(&mut self) -> Result<()> {
        let session = self.handle.query_session().await?;
        let records = self.handle.query_listing().await?;
        self.app_state.clamp_selection(records.len());
        *self.consumer.view_mut() = ViewModel::from_snapshot(session, records);
        Ok(())
    }

    fn handle_feedback(&mut self, feedback: CommandFeedback, terminal: &mut Tui) -> Result<()> {
        if let Some(entry) = feedback.message() {
            self.consumer.message_log_mut().push(entry);
            self.render(terminal)?;
        }
        Ok(())
    }
}

/// Receives from an optional subscription; a missing one never resolves.
async fn recv(
    rx: &mut Option<broadcast::Receiver<RuntimeEvent>>,
) -> Result<RuntimeEvent, RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
