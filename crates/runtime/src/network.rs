//! Network guard: is the wallet on the chain the registry lives on?

use kot_blockchain_core::{ChainDescriptor, ChainId, NetworkName};

use crate::api::WorkflowError;
use crate::gateway::{ProviderGateway, SwitchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum NetworkState {
    /// No chain observed yet (startup, after a reset, or no provider).
    Unknown,
    WrongNetwork,
    Ready,
}

/// Tracks the wallet's active chain against the target chain.
#[derive(Debug, Clone)]
pub struct NetworkGuard {
    target: ChainDescriptor,
    observed: Option<ChainId>,
}

impl NetworkGuard {
    pub fn new(target: ChainDescriptor) -> Self {
        Self {
            target,
            observed: None,
        }
    }

    pub fn target(&self) -> &ChainDescriptor {
        &self.target
    }

    pub fn observed(&self) -> Option<ChainId> {
        self.observed
    }

    /// Display name of the observed chain.
    pub fn network_name(&self) -> Option<NetworkName> {
        self.observed.map(NetworkName::from_chain_id)
    }

    pub fn state(&self) -> NetworkState {
        match self.observed {
            None => NetworkState::Unknown,
            Some(id) if id == self.target.chain_id => NetworkState::Ready,
            Some(_) => NetworkState::WrongNetwork,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == NetworkState::Ready
    }

    pub fn observe(&mut self, chain_id: ChainId) -> NetworkState {
        self.observed = Some(chain_id);
        self.state()
    }

    pub fn reset(&mut self) {
        self.observed = None;
    }

    /// Gate for operations that must run on the target chain.
    pub fn ensure_ready(&self) -> Result<(), WorkflowError> {
        if self.is_ready() {
            return Ok(());
        }
        Err(WorkflowError::WrongNetwork {
            expected: self.target.network_name(),
            actual: self.network_name().unwrap_or(NetworkName::Unknown),
        })
    }
}

/// How the wallet ended up on the target chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    /// The chain was unknown to the wallet and had to be added first.
    Added,
}

/// Ask the wallet to move to `target`, registering the chain when the wallet
/// does not know it.
///
/// Success does not change any local state; the wallet reports the new chain
/// through a `chainChanged` event.
pub async fn request_switch(
    gateway: &ProviderGateway,
    target: &ChainDescriptor,
) -> Result<SwitchOutcome, WorkflowError> {
    if !gateway.is_available() {
        return Err(WorkflowError::ProviderUnavailable);
    }

    let network = target.network_name();
    match gateway.switch_chain(target.chain_id).await {
        Ok(()) => Ok(SwitchOutcome::Switched),
        Err(SwitchError::NotRegistered(chain_id)) => {
            tracing::info!(%chain_id, "wallet does not know target chain, adding it");
            gateway
                .add_chain(target)
                .await
                .map(|()| SwitchOutcome::Added)
                .map_err(|e| WorkflowError::NetworkSetupFailed {
                    network,
                    reason: e.to_string(),
                })
        }
        Err(SwitchError::Provider(e)) if e.is_user_rejected() => Err(WorkflowError::UserRejected),
        Err(SwitchError::Provider(e)) => Err(WorkflowError::NetworkSetupFailed {
            network,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use kot_blockchain_core::{MockBehavior, MockWallet};

    #[test]
    fn state_follows_observed_chain() {
        let mut guard = NetworkGuard::new(ChainDescriptor::polygon_mumbai());
        assert_eq!(guard.state(), NetworkState::Unknown);

        assert_eq!(guard.observe(ChainId(1)), NetworkState::WrongNetwork);
        assert_eq!(guard.network_name(), Some(NetworkName::Mainnet));
        assert_eq!(
            guard.ensure_ready(),
            Err(WorkflowError::WrongNetwork {
                expected: NetworkName::PolygonMumbai,
                actual: NetworkName::Mainnet,
            })
        );

        assert_eq!(guard.observe(ChainId::POLYGON_MUMBAI), NetworkState::Ready);
        assert!(guard.ensure_ready().is_ok());

        guard.reset();
        assert_eq!(guard.state(), NetworkState::Unknown);
    }

    #[tokio::test]
    async fn switch_adds_unknown_chain() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI)
            .on_chain(ChainId(1))
            .without_chain(ChainId::POLYGON_MUMBAI);
        let gateway = ProviderGateway::new(Arc::new(wallet.clone()));

        let outcome = request_switch(&gateway, &ChainDescriptor::polygon_mumbai()).await;
        assert_eq!(outcome, Ok(SwitchOutcome::Added));
        assert_eq!(wallet.added_chains(), vec![ChainDescriptor::polygon_mumbai()]);
        assert_eq!(wallet.chain_id(), ChainId::POLYGON_MUMBAI);
    }

    #[tokio::test]
    async fn failed_add_surfaces_setup_failure() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI)
            .on_chain(ChainId(1))
            .without_chain(ChainId::POLYGON_MUMBAI)
            .with_behavior(MockBehavior {
                fail_add_chain: true,
                ..MockBehavior::default()
            });
        let gateway = ProviderGateway::new(Arc::new(wallet.clone()));

        let outcome = request_switch(&gateway, &ChainDescriptor::polygon_mumbai()).await;
        assert!(matches!(
            outcome,
            Err(WorkflowError::NetworkSetupFailed {
                network: NetworkName::PolygonMumbai,
                ..
            })
        ));
        assert_eq!(wallet.chain_id(), ChainId(1));
    }

    #[tokio::test]
    async fn declined_switch_is_user_rejection() {
        let wallet = MockWallet::new(ChainId::POLYGON_MUMBAI)
            .on_chain(ChainId(1))
            .with_behavior(MockBehavior {
                reject_switch: true,
                ..MockBehavior::default()
            });
        let gateway = ProviderGateway::new(Arc::new(wallet));

        let outcome = request_switch(&gateway, &ChainDescriptor::polygon_mumbai()).await;
        assert_eq!(outcome, Err(WorkflowError::UserRejected));
    }

    #[tokio::test]
    async fn switch_without_provider_is_unavailable() {
        let outcome =
            request_switch(&ProviderGateway::unavailable(), &ChainDescriptor::polygon_mumbai())
                .await;
        assert_eq!(outcome, Err(WorkflowError::ProviderUnavailable));
    }
}
