//! Top-level client orchestrating the Runtime and a Frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ Runtime (session worker: wallet, network guard, mint workflow, listing)
//!   ├─→ Frontend (UI layer, talks to the runtime only through RuntimeHandle)
//!   └─→ Wallet watcher (optional, turns wallet polling into provider events)
//! ```

mod builder;

pub use builder::ClientBuilder;

// Re-export Frontend trait from kot-frontend-core
pub use kot_frontend_core::Frontend;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` receives an already running runtime and a frontend
/// 2. `Client::run()` transfers control to the frontend until the user quits
/// 3. On frontend exit the runtime worker and the wallet watcher are stopped
pub struct Client {
    runtime: kot_runtime::Runtime,
    frontend: Box<dyn Frontend>,
    watcher: Option<JoinHandle<()>>,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the frontend, then tear down the background tasks.
    ///
    /// The frontend's error wins over a shutdown error.
    pub async fn run(self) -> Result<()> {
        let Client {
            runtime,
            mut frontend,
            watcher,
        } = self;

        let frontend_result = frontend.run(runtime.handle()).await;

        if let Some(watcher) = watcher {
            watcher.abort();
            let _ = watcher.await;
        }
        let shutdown_result = runtime
            .shutdown()
            .await
            .context("Runtime did not shut down cleanly");

        frontend_result.and(shutdown_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kot_blockchain_core::{ChainId, MockWallet};
    use kot_runtime::RuntimeHandle;
    use std::sync::Arc;

    /// Frontend that connects once and records the resulting account.
    struct ScriptedFrontend {
        connected: Arc<std::sync::Mutex<Option<kot_blockchain_core::Address>>>,
    }

    #[async_trait]
    impl Frontend for ScriptedFrontend {
        async fn run(&mut self, handle: RuntimeHandle) -> Result<()> {
            let account = handle.connect().await?;
            *self.connected.lock().unwrap() = account;
            Ok(())
        }
    }

    #[tokio::test]
    async fn frontend_drives_runtime_then_client_shuts_down() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI);
        let runtime = kot_runtime::Runtime::builder()
            .provider(Arc::new(wallet))
            .registry_address(MockWallet::REGISTRY)
            .build()
            .await
            .unwrap();

        let connected = Arc::new(std::sync::Mutex::new(None));
        let client = Client::builder()
            .runtime(runtime)
            .frontend(ScriptedFrontend {
                connected: connected.clone(),
            })
            .build()
            .unwrap();

        client.run().await.unwrap();
        assert_eq!(*connected.lock().unwrap(), Some(MockWallet::ALICE));
    }

    #[test]
    fn builder_requires_runtime_and_frontend() {
        let err = Client::builder().build().err().unwrap();
        assert!(err.to_string().contains("Runtime is required"));
    }
}
