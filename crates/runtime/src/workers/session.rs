//! Session worker that owns the wallet session, network guard, workflow slot,
//! and listing cache.
//!
//! State is only ever mutated on this task. Anything that can suspend on the
//! wallet (prompts, transactions, receipts, contract reads) is spawned and
//! reports back through an internal channel, tagged with the epoch it started
//! in. A `chainChanged` event bumps the epoch, so results from before the
//! reset are delivered to their caller but never applied to state. A workflow
//! still running across a reset keeps the slot until it settles; its next send
//! sees the new epoch and fails with `WrongNetwork`.

use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, trace, warn};

use kot_blockchain_core::{Address, ChainId, ProviderError, ProviderEvent};

use crate::api::{Result, RuntimeError, WorkflowError};
use crate::events::{Event, EventBus, ListingEvent, SessionEvent, WorkflowEvent};
use crate::gateway::ProviderGateway;
use crate::listing::{ListingCache, MintRecord};
use crate::network::{NetworkGuard, SwitchOutcome, request_switch};
use crate::pricing::Price;
use crate::registry::{NameEntry, RegistryClient};
use crate::session::{SessionSnapshot, SessionState};
use crate::workflow::{
    MintOutcome, MintRequest, MintWorkflow, Progress, SessionEpoch, WorkflowKind, WorkflowStatus,
};

type ListingReply = oneshot::Sender<Result<Vec<MintRecord>>>;

/// Commands that can be sent to the session worker
pub enum Command {
    /// Request account access (interactive).
    Connect {
        reply: oneshot::Sender<Result<Option<Address>>>,
    },
    /// Move the wallet to the target chain.
    SwitchNetwork { reply: oneshot::Sender<Result<()>> },
    /// Register a name and set its record.
    Mint {
        request: MintRequest,
        reply: oneshot::Sender<Result<MintOutcome>>,
    },
    /// Replace the record of an owned name.
    UpdateRecord {
        request: MintRequest,
        reply: oneshot::Sender<Result<MintOutcome>>,
    },
    /// Re-read the registry into the listing cache.
    RefreshListing { reply: ListingReply },
    QuerySession {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    QueryListing {
        reply: oneshot::Sender<Vec<MintRecord>>,
    },
}

/// Results of spawned tasks, tagged with the epoch they started in.
enum Outcome {
    Connected {
        epoch: u64,
        result: std::result::Result<Vec<Address>, ProviderError>,
        reply: oneshot::Sender<Result<Option<Address>>>,
    },
    Switched {
        result: std::result::Result<SwitchOutcome, WorkflowError>,
        reply: oneshot::Sender<Result<()>>,
    },
    Progress {
        epoch: u64,
        progress: Progress,
    },
    Settled {
        epoch: u64,
        result: std::result::Result<MintOutcome, WorkflowError>,
        reply: oneshot::Sender<Result<MintOutcome>>,
    },
    RefreshDue {
        epoch: u64,
    },
    ListingLoaded {
        epoch: u64,
        result: std::result::Result<Vec<NameEntry>, WorkflowError>,
        reply: Option<ListingReply>,
    },
}

/// What the provider event stream produced.
enum ProviderSignal {
    Event(ProviderEvent),
    Lagged(u64),
    Closed,
}

/// Background task that serializes every session transition.
pub struct SessionWorker {
    gateway: ProviderGateway,
    registry: RegistryClient,
    workflow: MintWorkflow,
    session: SessionState,
    guard: NetworkGuard,
    listing: ListingCache,
    status: WorkflowStatus,
    /// Kind and name of the workflow currently owning the slot.
    active: Option<(WorkflowKind, String)>,
    epoch: u64,
    /// Published copy of `epoch` for running sagas.
    epoch_tx: watch::Sender<u64>,
    refresh_delay: Duration,
    command_rx: mpsc::Receiver<Command>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub fn new(
        gateway: ProviderGateway,
        registry: RegistryClient,
        workflow: MintWorkflow,
        guard: NetworkGuard,
        refresh_delay: Duration,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (epoch_tx, _) = watch::channel(0);
        info!(
            provider = gateway.provider_name(),
            target = %guard.target().network_name(),
            registry = %registry.address(),
            "SessionWorker initialized"
        );

        Self {
            session: SessionState::new(gateway.is_available()),
            gateway,
            registry,
            workflow,
            guard,
            listing: ListingCache::new(),
            status: WorkflowStatus::Idle,
            active: None,
            epoch: 0,
            epoch_tx,
            refresh_delay,
            command_rx,
            outcome_tx,
            outcome_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    ///
    /// Derives the initial session first, so commands queued during startup
    /// observe the derived state.
    pub async fn run(mut self) {
        let mut provider_rx = self.gateway.subscribe();
        self.derive().await;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(outcome) = self.outcome_rx.recv() => {
                    self.handle_outcome(outcome);
                }
                signal = next_provider_signal(&mut provider_rx) => {
                    self.handle_provider_signal(signal, &mut provider_rx).await;
                }
            }
        }

        debug!("session worker stopped (all handles dropped)");
    }

    // ------------------------------------------------------------------
    // Derivation and resets
    // ------------------------------------------------------------------

    /// Read accounts and chain without prompting.
    async fn derive(&mut self) {
        if self.gateway.is_available() {
            match self.gateway.request_accounts(false).await {
                Ok(accounts) => {
                    self.session.apply_accounts(&accounts);
                }
                Err(e) => warn!("failed to read authorized accounts: {e}"),
            }
            match self.gateway.chain_id().await {
                Ok(chain_id) => {
                    let state = self.guard.observe(chain_id);
                    debug!(%chain_id, %state, "observed wallet chain");
                }
                Err(e) => warn!("failed to read wallet chain: {e}"),
            }
        } else {
            info!("no wallet provider; session stays disconnected");
        }

        self.publish_session();
        if self.guard.is_ready() {
            self.start_refresh(None);
        }
    }

    async fn hard_reset(&mut self, chain_id: ChainId) {
        self.epoch += 1;
        self.epoch_tx.send_replace(self.epoch);
        info!(epoch = self.epoch, %chain_id, "wallet chain changed, resetting session");

        self.session.disconnect();
        self.guard.reset();
        self.listing.clear();
        if !self.status.is_in_flight() {
            self.status = WorkflowStatus::Idle;
            self.active = None;
        }

        self.event_bus.publish(Event::Session(SessionEvent::HardReset {
            epoch: self.epoch,
            chain_id,
        }));
        self.event_bus.publish(Event::Listing(ListingEvent::Cleared));

        self.derive().await;
    }

    async fn handle_provider_signal(
        &mut self,
        signal: ProviderSignal,
        provider_rx: &mut Option<broadcast::Receiver<ProviderEvent>>,
    ) {
        match signal {
            ProviderSignal::Event(ProviderEvent::ChainChanged(chain_id)) => {
                self.hard_reset(chain_id).await;
            }
            ProviderSignal::Event(ProviderEvent::AccountsChanged(accounts)) => {
                if self.session.apply_accounts(&accounts) {
                    info!(account = ?self.session.account(), "wallet account changed");
                    self.publish_session();
                    if self.guard.is_ready() {
                        self.start_refresh(None);
                    }
                }
            }
            ProviderSignal::Lagged(skipped) => {
                // A missed chainChanged cannot be ruled out.
                warn!(skipped, "provider events lagged, resynchronizing");
                match self.gateway.chain_id().await {
                    Ok(chain_id) => self.hard_reset(chain_id).await,
                    Err(e) => warn!("failed to read wallet chain: {e}"),
                }
            }
            ProviderSignal::Closed => {
                warn!("provider event stream closed");
                *provider_rx = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Connect { reply } => self.start_connect(reply),
            Command::SwitchNetwork { reply } => self.start_switch(reply),
            Command::Mint { request, reply } => {
                self.start_workflow(WorkflowKind::Mint, request, reply);
            }
            Command::UpdateRecord { request, reply } => {
                self.start_workflow(WorkflowKind::UpdateRecord, request, reply);
            }
            Command::RefreshListing { reply } => self.start_refresh(Some(reply)),
            Command::QuerySession { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("QuerySession reply channel closed (caller dropped)");
                }
            }
            Command::QueryListing { reply } => {
                if reply.send(self.listing.snapshot()).is_err() {
                    debug!("QueryListing reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn start_connect(&self, reply: oneshot::Sender<Result<Option<Address>>>) {
        if !self.gateway.is_available() {
            let _ = reply.send(Err(WorkflowError::ProviderUnavailable.into()));
            return;
        }

        let epoch = self.epoch;
        let gateway = self.gateway.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = gateway.request_accounts(true).await;
            let _ = outcome_tx.send(Outcome::Connected {
                epoch,
                result,
                reply,
            });
        });
    }

    fn start_switch(&self, reply: oneshot::Sender<Result<()>>) {
        if !self.gateway.is_available() {
            let _ = reply.send(Err(WorkflowError::ProviderUnavailable.into()));
            return;
        }
        if self.guard.is_ready() {
            let _ = reply.send(Ok(()));
            return;
        }

        let gateway = self.gateway.clone();
        let target = self.guard.target().clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = request_switch(&gateway, &target).await;
            let _ = outcome_tx.send(Outcome::Switched { result, reply });
        });
    }

    fn start_workflow(
        &mut self,
        kind: WorkflowKind,
        request: MintRequest,
        reply: oneshot::Sender<Result<MintOutcome>>,
    ) {
        let (from, price) = match self.admit(kind, &request) {
            Ok(admitted) => admitted,
            Err(error) => {
                debug!(%kind, name = %request.name, %error, "workflow refused");
                self.event_bus
                    .publish(Event::Workflow(WorkflowEvent::Rejected {
                        kind,
                        error: error.clone(),
                    }));
                let _ = reply.send(Err(error.into()));
                return;
            }
        };

        self.active = Some((kind, request.name.clone()));
        self.set_status(WorkflowStatus::Submitting);

        let epoch = self.epoch;
        let session = SessionEpoch::new(self.epoch_tx.subscribe());
        let workflow = self.workflow.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let progress_tx = outcome_tx.clone();
            let progress = move |progress| {
                let _ = progress_tx.send(Outcome::Progress { epoch, progress });
            };
            let result = match price {
                Some(price) => {
                    workflow
                        .mint(&session, from, &request, price, progress)
                        .await
                }
                None => {
                    workflow
                        .update_record(&session, from, &request, progress)
                        .await
                }
            };
            let _ = outcome_tx.send(Outcome::Settled {
                epoch,
                result,
                reply,
            });
        });
    }

    /// Preconditions for starting a workflow.
    ///
    /// Validation runs before anything touches the wallet.
    fn admit(
        &mut self,
        kind: WorkflowKind,
        request: &MintRequest,
    ) -> std::result::Result<(Address, Option<Price>), WorkflowError> {
        if self.status.is_in_flight() {
            return Err(WorkflowError::Busy);
        }
        self.set_status(WorkflowStatus::Idle);

        let price = match kind {
            WorkflowKind::Mint => Some(request.validate_mint()?),
            WorkflowKind::UpdateRecord => {
                request.validate_update()?;
                None
            }
        };
        if !self.gateway.is_available() {
            return Err(WorkflowError::ProviderUnavailable);
        }
        let from = self.session.account().ok_or(WorkflowError::NotConnected)?;
        self.guard.ensure_ready()?;
        Ok((from, price))
    }

    fn start_refresh(&self, reply: Option<ListingReply>) {
        if let Err(error) = self.guard.ensure_ready() {
            if let Some(reply) = reply {
                let _ = reply.send(Err(error.into()));
            }
            return;
        }

        let epoch = self.epoch;
        let registry = self.registry.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = registry.list_all().await.map_err(WorkflowError::from);
            let _ = outcome_tx.send(Outcome::ListingLoaded {
                epoch,
                result,
                reply,
            });
        });
    }

    /// Refresh the listing once the chain has had time to index the change.
    fn schedule_refresh(&self) {
        let epoch = self.epoch;
        let delay = self.refresh_delay;
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = outcome_tx.send(Outcome::RefreshDue { epoch });
        });
    }

    // ------------------------------------------------------------------
    // Outcomes
    // ------------------------------------------------------------------

    fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Connected {
                epoch,
                result,
                reply,
            } => {
                let response = match result {
                    Ok(accounts) => {
                        if epoch == self.epoch && self.session.apply_accounts(&accounts) {
                            info!(account = ?self.session.account(), "wallet connected");
                            self.publish_session();
                            if self.guard.is_ready() {
                                self.start_refresh(None);
                            }
                        }
                        Ok(accounts.first().copied())
                    }
                    Err(e) if e.is_user_rejected() => {
                        info!("connect request declined in wallet");
                        Ok(None)
                    }
                    Err(e) => Err(RuntimeError::from(WorkflowError::from(e))),
                };
                let _ = reply.send(response);
            }

            Outcome::Switched { result, reply } => {
                let response = match result {
                    Ok(outcome) => {
                        info!(?outcome, "wallet accepted network switch");
                        Ok(())
                    }
                    Err(error) => {
                        if !error.is_silent() {
                            warn!(%error, "network switch failed");
                            self.event_bus.publish(Event::Session(
                                SessionEvent::NetworkSetupFailed {
                                    error: error.clone(),
                                },
                            ));
                        }
                        Err(error.into())
                    }
                };
                let _ = reply.send(response);
            }

            Outcome::Progress { epoch, progress } => {
                if epoch != self.epoch {
                    trace!(epoch, "dropping progress from before reset");
                    return;
                }
                match progress {
                    Progress::Sent { stage, hash } => {
                        self.set_status(WorkflowStatus::AwaitingConfirmation);
                        let explorer_url = self.guard.target().explorer_tx_url(&hash);
                        self.event_bus
                            .publish(Event::Workflow(WorkflowEvent::TransactionSent {
                                stage,
                                hash,
                                explorer_url,
                            }));
                    }
                    Progress::Confirmed { stage, hash } => {
                        self.event_bus
                            .publish(Event::Workflow(WorkflowEvent::TransactionConfirmed {
                                stage,
                                hash,
                            }));
                    }
                }
            }

            Outcome::Settled {
                epoch,
                result,
                reply,
            } => {
                if epoch == self.epoch {
                    self.settle(&result);
                } else {
                    debug!(epoch, "workflow settled after reset; releasing slot");
                    self.active = None;
                    self.set_status(WorkflowStatus::Idle);
                }
                let _ = reply.send(result.map_err(RuntimeError::from));
            }

            Outcome::RefreshDue { epoch } => {
                if epoch == self.epoch {
                    self.start_refresh(None);
                }
            }

            Outcome::ListingLoaded {
                epoch,
                result,
                reply,
            } => {
                if epoch != self.epoch {
                    debug!(epoch, "dropping listing fetched before reset");
                    if let Some(reply) = reply {
                        let _ = reply.send(Err(RuntimeError::SessionReset));
                    }
                    return;
                }
                let response = match result {
                    Ok(entries) => {
                        self.listing.replace(entries);
                        let records = self.listing.snapshot();
                        debug!(count = records.len(), "listing refreshed");
                        self.event_bus
                            .publish(Event::Listing(ListingEvent::Refreshed {
                                records: records.clone(),
                            }));
                        Ok(records)
                    }
                    Err(error) => {
                        warn!(%error, "listing refresh failed");
                        self.event_bus
                            .publish(Event::Listing(ListingEvent::RefreshFailed {
                                error: error.clone(),
                            }));
                        Err(error.into())
                    }
                };
                if let Some(reply) = reply {
                    let _ = reply.send(response);
                }
            }
        }
    }

    fn settle(&mut self, result: &std::result::Result<MintOutcome, WorkflowError>) {
        let Some((kind, name)) = self.active.clone() else {
            return;
        };

        match result {
            Ok(outcome) => {
                info!(%kind, %name, "workflow succeeded");
                self.set_status(WorkflowStatus::Succeeded);
                self.event_bus
                    .publish(Event::Workflow(WorkflowEvent::Completed(outcome.clone())));
                self.set_status(WorkflowStatus::Idle);
                self.schedule_refresh();
            }
            Err(error) if error.is_silent() => {
                info!(%kind, %name, "workflow declined in wallet");
                self.set_status(WorkflowStatus::Idle);
            }
            Err(error) => {
                warn!(%kind, %name, %error, "workflow failed");
                self.set_status(WorkflowStatus::Failed);
                self.event_bus.publish(Event::Workflow(WorkflowEvent::Failed {
                    kind,
                    name,
                    error: error.clone(),
                }));
            }
        }
        self.active = None;
    }

    // ------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------

    fn set_status(&mut self, status: WorkflowStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        if let Some((kind, name)) = &self.active {
            self.event_bus
                .publish(Event::Workflow(WorkflowEvent::StatusChanged {
                    kind: *kind,
                    name: name.clone(),
                    status,
                }));
        }
        self.publish_session();
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            provider_available: self.session.provider_available(),
            account: self.session.account(),
            chain_id: self.guard.observed(),
            network: self.guard.network_name(),
            network_state: self.guard.state(),
            target_network: self.guard.target().network_name(),
            workflow_status: self.status,
            epoch: self.epoch,
        }
    }

    fn publish_session(&self) {
        self.event_bus
            .publish(Event::Session(SessionEvent::Changed(self.snapshot())));
    }
}

async fn next_provider_signal(
    provider_rx: &mut Option<broadcast::Receiver<ProviderEvent>>,
) -> ProviderSignal {
    let Some(receiver) = provider_rx else {
        return std::future::pending().await;
    };
    match receiver.recv().await {
        Ok(event) => ProviderSignal::Event(event),
        Err(RecvError::Lagged(skipped)) => ProviderSignal::Lagged(skipped),
        Err(RecvError::Closed) => ProviderSignal::Closed,
    }
}
