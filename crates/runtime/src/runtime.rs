//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up command/event channels, and
//! exposes a builder-based API for frontends.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use kot_blockchain_core::{Address, ChainDescriptor, WalletProvider};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::gateway::ProviderGateway;
use crate::network::NetworkGuard;
use crate::registry::{DEFAULT_RECEIPT_POLL, RegistryClient};
use crate::workers::{Command, SessionWorker};
use crate::workflow::MintWorkflow;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Chain the registry is deployed on.
    pub target_chain: ChainDescriptor,
    /// Registry contract address; required.
    pub registry_address: Option<Address>,
    /// Delay between a successful workflow and the listing refresh.
    pub refresh_delay: Duration,
    pub receipt_poll_interval: Duration,
    /// Give up waiting for a receipt after this long (`None` waits forever).
    pub confirmation_timeout: Option<Duration>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_chain: ChainDescriptor::polygon_mumbai(),
            registry_address: None,
            refresh_delay: Duration::from_secs(2),
            receipt_poll_interval: DEFAULT_RECEIPT_POLL,
            confirmation_timeout: None,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that drives the wallet session.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stop the session worker.
    ///
    /// In-flight wallet requests are abandoned; transactions already sent stay
    /// on chain.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.abort();

        match self.worker_handle.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(RuntimeError::WorkerJoin(e)),
        }
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    provider: Option<Arc<dyn WalletProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Wallet provider to drive. Without one the runtime still starts and
    /// reports the provider as unavailable.
    pub fn provider(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn registry_address(mut self, address: Address) -> Self {
        self.config.registry_address = Some(address);
        self
    }

    pub fn target_chain(mut self, target: ChainDescriptor) -> Self {
        self.config.target_chain = target;
        self
    }

    /// Build the runtime and start the session worker.
    pub async fn build(self) -> Result<Runtime> {
        let registry_address = self
            .config
            .registry_address
            .ok_or(RuntimeError::MissingRegistry)?;

        let gateway = match self.provider {
            Some(provider) => ProviderGateway::new(provider),
            None => ProviderGateway::unavailable(),
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let registry = RegistryClient::new(gateway.clone(), registry_address)
            .with_receipt_poll(self.config.receipt_poll_interval);
        let workflow = MintWorkflow::new(
            registry.clone(),
            self.config.target_chain.chain_id,
            self.config.confirmation_timeout,
        );

        let worker = SessionWorker::new(
            gateway,
            registry,
            workflow,
            NetworkGuard::new(self.config.target_chain),
            self.config.refresh_delay,
            command_rx,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
