//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the session or streaming events from specific topics.

use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use kot_blockchain_core::Address;

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::listing::MintRecord;
use crate::session::SessionSnapshot;
use crate::workers::Command;
use crate::workflow::{MintOutcome, MintRequest};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn send<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Ask the wallet for account access (may open a wallet prompt).
    ///
    /// Resolves to the active account, or `None` if the user declined.
    pub async fn connect(&self) -> Result<Option<Address>> {
        self.send(|reply| Command::Connect { reply }).await?
    }

    /// Ask the wallet to move to the target chain, adding it if needed.
    ///
    /// The session updates once the wallet reports the change.
    pub async fn switch_network(&self) -> Result<()> {
        self.send(|reply| Command::SwitchNetwork { reply }).await?
    }

    /// Register a name and attach its record.
    ///
    /// Resolves once both transactions are confirmed or the saga fails.
    pub async fn mint(&self, request: MintRequest) -> Result<MintOutcome> {
        self.send(|reply| Command::Mint { request, reply }).await?
    }

    /// Replace the record of a name the connected account owns.
    pub async fn update_record(&self, request: MintRequest) -> Result<MintOutcome> {
        self.send(|reply| Command::UpdateRecord { request, reply })
            .await?
    }

    /// Fetch the listing from the registry and replace the cache.
    pub async fn refresh_listing(&self) -> Result<Vec<MintRecord>> {
        self.send(|reply| Command::RefreshListing { reply }).await?
    }

    /// Current session state (read-only snapshot)
    pub async fn query_session(&self) -> Result<SessionSnapshot> {
        self.send(|reply| Command::QuerySession { reply }).await
    }

    /// Last fetched listing, without touching the chain.
    pub async fn query_listing(&self) -> Result<Vec<MintRecord>> {
        self.send(|reply| Command::QueryListing { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use kot_runtime::Topic;
    ///
    /// let mut workflow_rx = handle.subscribe(Topic::Workflow);
    /// while let Ok(event) = workflow_rx.recv().await {
    ///     // Render progress
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
