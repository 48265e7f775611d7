//! Wallet discovery.
//!
//! The wallet is an external process reached over JSON-RPC. Its absence is a
//! normal state: the runtime then starts with no provider and reports it as
//! unavailable.
use std::sync::Arc;

use tokio::task::JoinHandle;

use kot_blockchain_core::WalletProvider;
use kot_blockchain_evm::{EvmConfig, JsonRpcWallet};

/// A reachable wallet plus the task that turns polling into provider events.
pub struct DetectedWallet {
    pub provider: Arc<dyn WalletProvider>,
    pub watcher: JoinHandle<()>,
}

/// Probe the configured endpoint and start its watcher if something answers.
pub async fn detect_wallet(config: &EvmConfig) -> Option<DetectedWallet> {
    let wallet = JsonRpcWallet::detect(config.clone()).await?;
    tracing::info!(url = %config.wallet_url, "wallet provider detected");

    let watcher = wallet.spawn_watcher();
    Some(DetectedWallet {
        provider: Arc::new(wallet),
        watcher,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_not_a_wallet() {
        let config = EvmConfig::new("http://127.0.0.1:9");
        assert!(detect_wallet(&config).await.is_none());
    }
}
