//! Polling watcher that synthesizes provider events.
//!
//! HTTP gives no push channel, so the watcher re-reads `eth_chainId` and
//! `eth_accounts` on an interval and emits an event whenever either differs
//! from the previous observation.

use std::time::Duration;

use kot_blockchain_core::{Address, ChainId, ProviderEvent, WalletProvider, methods};
use serde_json::json;
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

use crate::client::JsonRpcWallet;

/// Last observed chain id and account list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WatchState {
    chain_id: Option<ChainId>,
    accounts: Option<Vec<Address>>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation and return the events it implies.
    ///
    /// The first observation only sets the baseline. `None` accounts means the
    /// read failed; the previous list stays and no account event is emitted.
    pub fn observe(
        &mut self,
        chain_id: ChainId,
        accounts: Option<Vec<Address>>,
    ) -> Vec<ProviderEvent> {
        let mut events = Vec::new();

        if let Some(previous) = self.chain_id {
            if previous != chain_id {
                events.push(ProviderEvent::ChainChanged(chain_id));
            }
        }
        self.chain_id = Some(chain_id);

        let Some(accounts) = accounts else {
            return events;
        };
        if let Some(previous) = &self.accounts {
            if *previous != accounts {
                events.push(ProviderEvent::AccountsChanged(accounts.clone()));
            }
        }
        self.accounts = Some(accounts);

        events
    }
}

pub(crate) async fn run(wallet: JsonRpcWallet, interval: Duration) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut state = WatchState::new();

    loop {
        ticker.tick().await;

        let chain_id = match read_chain_id(&wallet).await {
            Some(id) => id,
            None => continue,
        };
        let accounts = read_accounts(&wallet).await;

        for event in state.observe(chain_id, accounts) {
            wallet.publish(event);
        }
    }
}

async fn read_chain_id(wallet: &JsonRpcWallet) -> Option<ChainId> {
    match wallet.request(methods::CHAIN_ID, json!([])).await {
        Ok(raw) => match serde_json::from_value(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Watcher got malformed chain id: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("Watcher failed to read chain id: {}", e);
            None
        }
    }
}

async fn read_accounts(wallet: &JsonRpcWallet) -> Option<Vec<Address>> {
    match wallet.request(methods::ACCOUNTS, json!([])).await {
        Ok(raw) => match serde_json::from_value(raw) {
            Ok(accounts) => Some(accounts),
            Err(e) => {
                warn!("Watcher got malformed accounts: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("Watcher failed to read accounts: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_silent() {
        let mut state = WatchState::new();
        assert!(state.observe(ChainId(1), Some(vec![])).is_empty());
    }

    #[test]
    fn chain_switch_emits_chain_changed() {
        let mut state = WatchState::new();
        state.observe(ChainId(1), Some(vec![]));
        let events = state.observe(ChainId::POLYGON_MUMBAI, Some(vec![]));
        assert_eq!(events, vec![ProviderEvent::ChainChanged(ChainId::POLYGON_MUMBAI)]);
    }

    #[test]
    fn account_change_emits_accounts_changed() {
        let alice = Address::repeat_byte(0xa1);
        let mut state = WatchState::new();
        state.observe(ChainId(1), Some(vec![]));
        let events = state.observe(ChainId(1), Some(vec![alice]));
        assert_eq!(events, vec![ProviderEvent::AccountsChanged(vec![alice])]);
        assert!(state.observe(ChainId(1), Some(vec![alice])).is_empty());
    }

    #[test]
    fn failed_account_read_keeps_the_session() {
        let alice = Address::repeat_byte(0xa1);
        let mut state = WatchState::new();
        state.observe(ChainId(1), Some(vec![alice]));

        assert!(state.observe(ChainId(1), None).is_empty());
        assert!(state.observe(ChainId(1), Some(vec![alice])).is_empty());
    }

    #[test]
    fn chain_change_survives_failed_account_read() {
        let mut state = WatchState::new();
        state.observe(ChainId(1), Some(vec![]));
        let events = state.observe(ChainId::POLYGON_MUMBAI, None);
        assert_eq!(events, vec![ProviderEvent::ChainChanged(ChainId::POLYGON_MUMBAI)]);
    }
}
