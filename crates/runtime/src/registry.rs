//! Typed client for the .kot registry contract.
//!
//! Writes go through `eth_sendTransaction` and hand back a
//! [`TransactionHandle`] that can be awaited for its receipt. Reads go through
//! `eth_call` and are decoded with the contract ABI.

use std::time::Duration;

use alloy_sol_types::{SolCall, SolValue};
use futures::future::try_join_all;
use tokio::time::{Instant, sleep};

use kot_blockchain_core::{
    Address, Bytes, CallRequest, ChainId, IKotRegistry, ProviderError, Receipt, TransactionRequest,
    TxHash,
};

use crate::gateway::ProviderGateway;
use crate::pricing::Price;

/// Default interval between receipt polls.
pub const DEFAULT_RECEIPT_POLL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("failed to decode {call} result: {reason}")]
    Decode { call: &'static str, reason: String },

    #[error("transaction {hash} was not confirmed within {waited:?}")]
    Timeout { hash: TxHash, waited: Duration },
}

/// One registered name with its owner and record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub name: String,
    pub record: String,
    pub owner: Address,
}

#[derive(Debug, Clone)]
pub struct RegistryClient {
    gateway: ProviderGateway,
    address: Address,
    receipt_poll: Duration,
}

impl RegistryClient {
    pub fn new(gateway: ProviderGateway, address: Address) -> Self {
        Self {
            gateway,
            address,
            receipt_poll: DEFAULT_RECEIPT_POLL,
        }
    }

    pub fn with_receipt_poll(mut self, interval: Duration) -> Self {
        self.receipt_poll = interval;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Chain the wallet is on right now.
    pub async fn chain_id(&self) -> Result<ChainId, RegistryError> {
        Ok(self.gateway.chain_id().await?)
    }

    /// Submit `register(name)` paying `price`.
    pub async fn register(
        &self,
        from: Address,
        name: &str,
        price: Price,
    ) -> Result<TransactionHandle, RegistryError> {
        let call = IKotRegistry::registerCall {
            name: name.to_string(),
        };
        self.send(from, call.abi_encode(), Some(price)).await
    }

    /// Submit `setRecord(name, record)`.
    pub async fn set_record(
        &self,
        from: Address,
        name: &str,
        record: &str,
    ) -> Result<TransactionHandle, RegistryError> {
        let call = IKotRegistry::setRecordCall {
            name: name.to_string(),
            record: record.to_string(),
        };
        self.send(from, call.abi_encode(), None).await
    }

    /// Every registered name with its owner and record.
    ///
    /// Per-name lookups run concurrently; any failure fails the whole listing.
    pub async fn list_all(&self) -> Result<Vec<NameEntry>, RegistryError> {
        let names: Vec<String> = self
            .read("getAllNames", IKotRegistry::getAllNamesCall {})
            .await?;
        tracing::debug!(count = names.len(), "fetched registered names");

        try_join_all(names.into_iter().map(|name| self.lookup(name))).await
    }

    async fn lookup(&self, name: String) -> Result<NameEntry, RegistryError> {
        let owner = self.owner_of(&name);
        let record = self.record_of(&name);
        let (owner, record) = futures::try_join!(owner, record)?;
        Ok(NameEntry {
            name,
            record,
            owner,
        })
    }

    pub async fn owner_of(&self, name: &str) -> Result<Address, RegistryError> {
        self.read(
            "domains",
            IKotRegistry::domainsCall {
                name: name.to_string(),
            },
        )
        .await
    }

    pub async fn record_of(&self, name: &str) -> Result<String, RegistryError> {
        self.read(
            "records",
            IKotRegistry::recordsCall {
                name: name.to_string(),
            },
        )
        .await
    }

    async fn send(
        &self,
        from: Address,
        data: Vec<u8>,
        price: Option<Price>,
    ) -> Result<TransactionHandle, RegistryError> {
        let tx = TransactionRequest {
            from,
            to: self.address,
            value: price.map(Price::wei),
            data: Bytes::from(data),
        };
        let hash = self.gateway.send_transaction(&tx).await?;
        tracing::info!(%hash, "transaction submitted");
        Ok(TransactionHandle {
            hash,
            gateway: self.gateway.clone(),
            poll: self.receipt_poll,
        })
    }

    async fn read<C, T>(&self, label: &'static str, call: C) -> Result<T, RegistryError>
    where
        C: SolCall,
        T: SolValue + From<<T::SolType as alloy_sol_types::SolType>::RustType>,
    {
        let request = CallRequest {
            to: self.address,
            data: Bytes::from(call.abi_encode()),
        };
        let output = self.gateway.call(&request).await?;
        T::abi_decode(&output, true).map_err(|e| RegistryError::Decode {
            call: label,
            reason: e.to_string(),
        })
    }
}

/// A submitted transaction that has not necessarily been mined.
#[derive(Debug, Clone)]
pub struct TransactionHandle {
    hash: TxHash,
    gateway: ProviderGateway,
    poll: Duration,
}

impl TransactionHandle {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Poll for the receipt until the transaction is mined.
    ///
    /// A mined-but-reverted transaction is returned as a receipt with
    /// [`kot_blockchain_core::ReceiptStatus::Failure`], not as an error.
    /// `timeout` of `None` waits indefinitely.
    pub async fn wait(&self, timeout: Option<Duration>) -> Result<Receipt, RegistryError> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.gateway.transaction_receipt(self.hash).await? {
                tracing::debug!(hash = %self.hash, status = ?receipt.status, "receipt received");
                return Ok(receipt);
            }
            if let Some(limit) = timeout
                && started.elapsed() >= limit
            {
                return Err(RegistryError::Timeout {
                    hash: self.hash,
                    waited: started.elapsed(),
                });
            }
            sleep(self.poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use kot_blockchain_core::{ChainId, MockBehavior, MockWallet, ReceiptStatus};

    fn client(wallet: &MockWallet) -> RegistryClient {
        RegistryClient::new(
            ProviderGateway::new(Arc::new(wallet.clone())),
            MockWallet::REGISTRY,
        )
        .with_receipt_poll(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn empty_registry_lists_nothing() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI);
        assert_eq!(client(&wallet).list_all().await, Ok(vec![]));
    }

    #[tokio::test]
    async fn listing_joins_owner_and_record() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI);
        wallet.seed_name("alpha", MockWallet::ALICE, "hello");
        wallet.seed_name("beta", MockWallet::BOB, "");

        let entries = client(&wallet).list_all().await.unwrap();
        assert_eq!(
            entries,
            vec![
                NameEntry {
                    name: "alpha".into(),
                    record: "hello".into(),
                    owner: MockWallet::ALICE,
                },
                NameEntry {
                    name: "beta".into(),
                    record: String::new(),
                    owner: MockWallet::BOB,
                },
            ]
        );
    }

    #[tokio::test]
    async fn register_then_set_record_reaches_chain() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI).granted();
        let registry = client(&wallet);

        let price = crate::pricing::price_for_name("gamma").unwrap();
        let tx = registry
            .register(MockWallet::ALICE, "gamma", price)
            .await
            .unwrap();
        assert!(tx.wait(None).await.unwrap().is_success());

        let tx = registry
            .set_record(MockWallet::ALICE, "gamma", "gm")
            .await
            .unwrap();
        assert!(tx.wait(None).await.unwrap().is_success());

        assert_eq!(wallet.owner_of("gamma"), Some(MockWallet::ALICE));
        assert_eq!(registry.record_of("gamma").await.unwrap(), "gm");
    }

    #[tokio::test]
    async fn reverted_transaction_is_a_failed_receipt() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI)
            .granted()
            .with_behavior(MockBehavior {
                revert_set_record: true,
                ..MockBehavior::default()
            });
        wallet.seed_name("delta", MockWallet::ALICE, "");

        let tx = client(&wallet)
            .set_record(MockWallet::ALICE, "delta", "x")
            .await
            .unwrap();
        assert_eq!(tx.wait(None).await.unwrap().status, ReceiptStatus::Failure);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_gives_up_after_timeout() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI)
            .granted()
            .with_behavior(MockBehavior {
                hold_receipts: true,
                ..MockBehavior::default()
            });
        let tx = client(&wallet)
            .register(MockWallet::ALICE, "epsilon", crate::pricing::Price::from_tenths(1))
            .await
            .unwrap();

        let result = tx.wait(Some(Duration::from_secs(3))).await;
        assert!(matches!(result, Err(RegistryError::Timeout { .. })));
    }

    #[tokio::test]
    async fn off_target_chain_read_fails_to_decode() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI).on_chain(ChainId(1));
        let result = client(&wallet).list_all().await;
        assert!(matches!(result, Err(RegistryError::Decode { call: "getAllNames", .. })));
    }
}
