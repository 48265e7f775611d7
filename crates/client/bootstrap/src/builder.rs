//! Builds the runtime and config bundle used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use kot_blockchain_core::WalletProvider;
use kot_runtime::Runtime;

use crate::config::ClientConfig;
use crate::wallet::detect_wallet;

/// Assembles wallet access, the runtime, and configuration for clients.
pub struct SetupBuilder {
    config: ClientConfig,
    provider: Option<Arc<dyn WalletProvider>>,
}

impl SetupBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            provider: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Use `provider` instead of probing the configured wallet endpoint.
    pub fn provider(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub async fn build(self) -> Result<RuntimeSetup> {
        let (provider, watcher) = match self.provider {
            Some(provider) => (Some(provider), None),
            None => match detect_wallet(&self.config.wallet).await {
                Some(detected) => (Some(detected.provider), Some(detected.watcher)),
                None => {
                    tracing::warn!(
                        url = %self.config.wallet.wallet_url,
                        "no wallet provider reachable; starting without one"
                    );
                    (None, None)
                }
            },
        };

        let mut builder = Runtime::builder().config(self.config.runtime.clone());
        if let Some(provider) = provider {
            builder = builder.provider(provider);
        }
        let runtime = builder.build().await.context("Failed to build runtime")?;

        Ok(RuntimeSetup {
            config: self.config,
            runtime,
            watcher,
        })
    }
}

pub struct RuntimeSetup {
    pub config: ClientConfig,
    pub runtime: Runtime,
    /// Chain/account watcher of a detected wallet.
    pub watcher: Option<JoinHandle<()>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_blockchain_core::{ChainId, MockWallet};

    #[tokio::test]
    async fn injected_provider_skips_detection() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI).granted();
        let setup = SetupBuilder::new(ClientConfig::new(MockWallet::REGISTRY))
            .provider(Arc::new(wallet))
            .build()
            .await
            .unwrap();

        assert!(setup.watcher.is_none());
        let session = setup.runtime.handle().query_session().await.unwrap();
        assert!(session.provider_available);
        assert_eq!(session.account, Some(MockWallet::ALICE));
    }
}
