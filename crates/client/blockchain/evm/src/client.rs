//! JSON-RPC wallet client.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kot_blockchain_core::{ProviderError, ProviderEvent, WalletProvider, methods};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::EvmConfig;
use crate::watcher;

const EVENT_BUFFER: usize = 32;

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcError {
    pub code: i64,
    pub message: String,
}

/// EIP-1193 provider reached over HTTP JSON-RPC.
///
/// Cloning is cheap; clones share the HTTP client, request counter and event
/// channel.
#[derive(Clone)]
pub struct JsonRpcWallet {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    config: EvmConfig,
    next_id: AtomicU64,
    events: broadcast::Sender<ProviderEvent>,
}

impl JsonRpcWallet {
    /// Create a wallet client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: EvmConfig) -> Result<Self, ProviderError> {
        config.validate().map_err(ProviderError::Transport)?;

        let http = Client::builder()
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                next_id: AtomicU64::new(1),
                events,
            }),
        })
    }

    /// Probe the configured endpoint.
    ///
    /// Returns `None` when nothing answers (no wallet running). A wallet that
    /// answers with an RPC error is still present, just not cooperative yet.
    pub async fn detect(config: EvmConfig) -> Option<Self> {
        let wallet = match Self::new(config) {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!("Wallet bridge misconfigured: {}", e);
                return None;
            }
        };

        match wallet.request(methods::CHAIN_ID, json!([])).await {
            Ok(_) | Err(ProviderError::Rpc { .. }) => {
                info!("Wallet detected at {}", wallet.inner.config.wallet_url);
                Some(wallet)
            }
            Err(e) => {
                info!(
                    "No wallet at {}: {}",
                    wallet.inner.config.wallet_url, e
                );
                None
            }
        }
    }

    /// Start the background watcher that emits provider events.
    pub fn spawn_watcher(&self) -> JoinHandle<()> {
        let wallet = self.clone();
        let interval = self.inner.config.poll_interval;
        tokio::spawn(async move {
            watcher::run(wallet, interval).await;
        })
    }

    /// Prompts wait on the user, so only plain reads are bounded.
    fn read_timeout(&self, method: &str) -> Option<Duration> {
        if methods::prompts_user(method) {
            return None;
        }
        self.inner.config.request_timeout
    }

    pub(crate) fn publish(&self, event: ProviderEvent) {
        debug!("Provider event: {}", event.name());
        if self.inner.events.send(event).is_err() {
            tracing::trace!("No provider event subscribers");
        }
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, method, "wallet request");

        let mut call = self
            .inner
            .http
            .post(&self.inner.config.wallet_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }));
        if let Some(timeout) = self.read_timeout(method) {
            call = call.timeout(timeout);
        }

        let response = call
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body: RpcResponse = response.json().await.map_err(|e| {
            if status.is_success() {
                ProviderError::Decode(e.to_string())
            } else {
                ProviderError::Transport(format!("HTTP {status}"))
            }
        })?;

        decode_response(body)
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.inner.events.subscribe()
    }

    fn name(&self) -> &str {
        &self.inner.config.wallet_url
    }
}

pub(crate) fn decode_response(body: RpcResponse) -> Result<Value, ProviderError> {
    if let Some(err) = body.error {
        return Err(ProviderError::rpc(err.code, err.message));
    }
    Ok(body.result.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: Value) -> RpcResponse {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn error_object_becomes_rpc_error() {
        let body = parse(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 4001, "message": "User rejected the request." }
        }));
        let err = decode_response(body).unwrap_err();
        assert!(err.is_user_rejected());
    }

    #[test]
    fn null_result_is_preserved() {
        let body = parse(json!({ "jsonrpc": "2.0", "id": 7, "result": null }));
        assert_eq!(decode_response(body).unwrap(), Value::Null);
    }

    #[test]
    fn timeout_spares_wallet_prompts() {
        let mut config = EvmConfig::default();
        config.request_timeout = Some(Duration::from_secs(3));
        let wallet = JsonRpcWallet::new(config).unwrap();

        assert_eq!(
            wallet.read_timeout(methods::CHAIN_ID),
            Some(Duration::from_secs(3))
        );
        assert_eq!(
            wallet.read_timeout(methods::TRANSACTION_RECEIPT),
            Some(Duration::from_secs(3))
        );
        assert_eq!(wallet.read_timeout(methods::REQUEST_ACCOUNTS), None);
        assert_eq!(wallet.read_timeout(methods::SEND_TRANSACTION), None);
        assert_eq!(wallet.read_timeout(methods::SWITCH_CHAIN), None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_not_detected() {
        // Port 9 (discard) is closed on test machines.
        let config = EvmConfig::new("http://127.0.0.1:9");
        assert!(JsonRpcWallet::detect(config).await.is_none());
    }
}
