//! Terminal frontend wiring the runtime handle to the event loop.
use anyhow::Result;
use async_trait::async_trait;

use kot_frontend_core::{EventConsumer, Frontend, FrontendConfig, SessionConsumer, ViewModel};
use kot_runtime::{RuntimeHandle, Topic};

use crate::config::CliConfig;
use crate::event::EventLoop;
use crate::presentation::terminal;

/// CLI frontend implementation.
///
/// Pure UI layer: it receives a [`RuntimeHandle`], subscribes to runtime
/// events, and issues commands through the handle. It never owns the runtime.
pub struct CliFrontend {
    frontend_config: FrontendConfig,
    cli_config: CliConfig,
}

impl CliFrontend {
    pub fn new(frontend_config: FrontendConfig, cli_config: CliConfig) -> Self {
        Self {
            frontend_config,
            cli_config,
        }
    }
}

#[async_trait]
impl Frontend for CliFrontend {
    async fn run(&mut self, handle: RuntimeHandle) -> Result<()> {
        tracing::info!("CLI frontend starting...");

        // Subscribe before the snapshot so nothing published in between is lost.
        let subscriptions =
            handle.subscribe_multiple(&[Topic::Session, Topic::Workflow, Topic::Listing]);
        let session = handle.query_session().await?;
        let records = handle.query_listing().await?;

        let mut consumer = SessionConsumer::new(self.frontend_config.messages.clone());
        *consumer.view_mut() = ViewModel::from_snapshot(session, records);
        consumer
            .message_log_mut()
            .push_text("Welcome to .kot names.");

        let event_loop = EventLoop::new(subscriptions, handle, consumer, self.cli_config.clone());

        let mut terminal = terminal::init()?;
        let _guard = terminal::TerminalGuard;

        let consumer = event_loop.run(&mut terminal).await?;

        terminal::restore()?;
        tracing::info!(
            messages = consumer.message_log().len(),
            "CLI frontend exiting"
        );

        Ok(())
    }
}
