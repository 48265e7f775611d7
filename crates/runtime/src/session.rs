//! Wallet session: provider presence and the connected account.

use kot_blockchain_core::{Address, ChainId, NetworkName};

use crate::network::NetworkState;
use crate::workflow::WorkflowStatus;

/// Connection state owned by the session worker.
///
/// The session counts as connected exactly when an account is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    provider_available: bool,
    account: Option<Address>,
}

impl SessionState {
    pub fn new(provider_available: bool) -> Self {
        Self {
            provider_available,
            account: None,
        }
    }

    pub fn provider_available(&self) -> bool {
        self.provider_available
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Adopt the wallet's account list; the first entry is the active account.
    ///
    /// Returns whether the active account changed.
    pub fn apply_accounts(&mut self, accounts: &[Address]) -> bool {
        let next = accounts.first().copied();
        let changed = next != self.account;
        self.account = next;
        changed
    }

    pub fn disconnect(&mut self) {
        self.account = None;
    }
}

/// Everything a frontend needs to render the session header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub provider_available: bool,
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    /// Display name of the wallet's chain, if observed.
    pub network: Option<NetworkName>,
    pub network_state: NetworkState,
    pub target_network: NetworkName,
    pub workflow_status: WorkflowStatus,
    /// Incremented on every hard reset.
    pub epoch: u64,
}

impl SessionSnapshot {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.network_state == NetworkState::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_account_is_active() {
        let alice = Address::repeat_byte(1);
        let bob = Address::repeat_byte(2);
        let mut session = SessionState::new(true);
        assert!(!session.is_connected());

        assert!(session.apply_accounts(&[alice, bob]));
        assert_eq!(session.account(), Some(alice));
        assert!(!session.apply_accounts(&[alice]));

        assert!(session.apply_accounts(&[]));
        assert!(!session.is_connected());
    }
}
