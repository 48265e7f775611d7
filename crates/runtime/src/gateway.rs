//! Typed access to the injected wallet provider.
//!
//! [`ProviderGateway`] is the only place that knows JSON-RPC method names and
//! parameter shapes. A gateway built without a provider answers every request
//! with [`ProviderError::Unavailable`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use kot_blockchain_core::{
    Address, Bytes, CallRequest, ChainDescriptor, ChainId, ProviderError, ProviderEvent, Receipt,
    TransactionRequest, TxHash, WalletProvider, methods,
};

/// Outcome of `wallet_switchEthereumChain` when it did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwitchError {
    #[error("chain {0} is not registered with the wallet")]
    NotRegistered(ChainId),

    #[error(transparent)]
    Provider(ProviderError),
}

#[derive(Clone, Default)]
pub struct ProviderGateway {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl ProviderGateway {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Gateway for an environment with no wallet installed.
    pub fn unavailable() -> Self {
        Self { provider: None }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.as_deref().map_or("none", |p| p.name())
    }

    /// Provider event stream, if a provider is present.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<ProviderEvent>> {
        self.provider.as_ref().map(|p| p.subscribe())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        let provider = self.provider.as_ref().ok_or(ProviderError::Unavailable)?;
        let raw = provider.request(method, params).await?;
        serde_json::from_value(raw)
            .map_err(|e| ProviderError::Decode(format!("{method}: {e}")))
    }

    /// Accounts exposed to the client.
    ///
    /// `interactive` uses `eth_requestAccounts` and may open a wallet prompt.
    /// The silent variant never prompts: any provider-side failure is read as
    /// "no authorized accounts".
    pub async fn request_accounts(&self, interactive: bool) -> Result<Vec<Address>, ProviderError> {
        if interactive {
            return self.request(methods::REQUEST_ACCOUNTS, json!([])).await;
        }
        match self.request(methods::ACCOUNTS, json!([])).await {
            Ok(accounts) => Ok(accounts),
            Err(ProviderError::Unavailable) => Err(ProviderError::Unavailable),
            Err(e) => {
                tracing::debug!("silent account lookup failed: {e}");
                Ok(Vec::new())
            }
        }
    }

    pub async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        self.request(methods::CHAIN_ID, json!([])).await
    }

    pub async fn switch_chain(&self, chain_id: ChainId) -> Result<(), SwitchError> {
        let params = json!([{ "chainId": chain_id.to_hex() }]);
        match self.request::<Value>(methods::SWITCH_CHAIN, params).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_unrecognized_chain() => Err(SwitchError::NotRegistered(chain_id)),
            Err(e) => Err(SwitchError::Provider(e)),
        }
    }

    pub async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError> {
        let params = json!([descriptor]);
        self.request::<Value>(methods::ADD_CHAIN, params)
            .await
            .map(|_| ())
    }

    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ProviderError> {
        self.request(methods::SEND_TRANSACTION, json!([tx])).await
    }

    pub async fn call(&self, call: &CallRequest) -> Result<Bytes, ProviderError> {
        self.request(methods::CALL, json!([call, "latest"])).await
    }

    /// Receipt for `hash`, or `None` while the transaction is pending.
    pub async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ProviderError> {
        self.request(methods::TRANSACTION_RECEIPT, json!([hash]))
            .await
    }
}

impl std::fmt::Debug for ProviderGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderGateway")
            .field("provider", &self.provider_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_blockchain_core::MockWallet;

    fn gateway(wallet: &MockWallet) -> ProviderGateway {
        ProviderGateway::new(Arc::new(wallet.clone()))
    }

    #[tokio::test]
    async fn missing_provider_reports_unavailable() {
        let gateway = ProviderGateway::unavailable();
        assert!(!gateway.is_available());
        assert!(gateway.subscribe().is_none());
        assert_eq!(gateway.chain_id().await, Err(ProviderError::Unavailable));
        assert_eq!(
            gateway.request_accounts(false).await,
            Err(ProviderError::Unavailable)
        );
    }

    #[tokio::test]
    async fn silent_lookup_never_prompts() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI);
        let gateway = gateway(&wallet);

        assert_eq!(gateway.request_accounts(false).await, Ok(vec![]));
        assert_eq!(wallet.call_count(methods::REQUEST_ACCOUNTS), 0);

        let granted = gateway.request_accounts(true).await.unwrap();
        assert_eq!(granted, vec![MockWallet::ALICE]);
        assert_eq!(gateway.request_accounts(false).await, Ok(granted));
    }

    #[tokio::test]
    async fn unknown_chain_maps_to_not_registered() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI)
            .on_chain(ChainId(1))
            .without_chain(ChainId::POLYGON_MUMBAI);
        let gateway = gateway(&wallet);

        assert_eq!(
            gateway.switch_chain(ChainId::POLYGON_MUMBAI).await,
            Err(SwitchError::NotRegistered(ChainId::POLYGON_MUMBAI))
        );

        gateway
            .add_chain(&ChainDescriptor::polygon_mumbai())
            .await
            .unwrap();
        assert_eq!(gateway.chain_id().await, Ok(ChainId::POLYGON_MUMBAI));
    }
}
