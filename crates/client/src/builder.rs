//! Client builder with dependency injection pattern.

use crate::{Client, Frontend};
use anyhow::{Context, Result};
use tokio::task::JoinHandle;

/// Builder for constructing a Client with proper validation.
///
/// Runtime and frontend are required; the wallet watcher is optional because
/// injected providers emit their own events.
#[derive(Default)]
pub struct ClientBuilder {
    runtime: Option<kot_runtime::Runtime>,
    frontend: Option<Box<dyn Frontend>>,
    watcher: Option<JoinHandle<()>>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime (required).
    ///
    /// It should be constructed via `SetupBuilder` from the `kot-bootstrap` crate.
    pub fn runtime(mut self, runtime: kot_runtime::Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Set the wallet watcher task (optional); it is stopped with the client.
    pub fn watcher(mut self, watcher: Option<JoinHandle<()>>) -> Self {
        self.watcher = watcher;
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime or the frontend is not set.
    pub fn build(self) -> Result<Client> {
        let runtime = self
            .runtime
            .context("Runtime is required. Use .runtime() to set it.")?;

        let frontend = self
            .frontend
            .context("Frontend is required. Use .frontend() to set it.")?;

        Ok(Client {
            runtime,
            frontend,
            watcher: self.watcher,
        })
    }
}
