//! Text formatting shared by frontends.
use kot_blockchain_core::{Address, NetworkName, TxHash};
use kot_runtime::{NetworkState, Price, WorkflowStatus, price_for_name};

/// `0x1234...abcd`.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

pub fn short_hash(hash: &TxHash) -> String {
    let full = hash.to_string();
    format!("{}...{}", &full[..10], &full[full.len() - 6..])
}

/// Price with the currency symbol, e.g. `0.5 MATIC`.
pub fn price_label(price: Price, symbol: &str) -> String {
    format!("{price} {symbol}")
}

/// Price hint for a name being typed; `None` while it is too short.
pub fn price_preview(name: &str, symbol: &str) -> Option<String> {
    price_for_name(name).map(|price| price_label(price, symbol))
}

pub fn network_label(network: Option<NetworkName>, state: NetworkState) -> String {
    match (network, state) {
        (_, NetworkState::Unknown) | (None, _) => "no network".to_string(),
        (Some(name), _) => name.to_string(),
    }
}

pub fn status_label(status: WorkflowStatus) -> &'static str {
    match status {
        WorkflowStatus::Idle => "idle",
        WorkflowStatus::Submitting => "waiting for wallet",
        WorkflowStatus::AwaitingConfirmation => "confirming",
        WorkflowStatus::Succeeded => "done",
        WorkflowStatus::Failed => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_shortened() {
        let address = Address::repeat_byte(0xab);
        // Display is checksummed, so compare case-insensitively.
        assert_eq!(short_address(&address).to_lowercase(), "0xabab...abab");
    }

    #[test]
    fn preview_waits_for_three_characters() {
        assert_eq!(price_preview("ab", "MATIC"), None);
        assert_eq!(price_preview("abc", "MATIC").as_deref(), Some("0.5 MATIC"));
        assert_eq!(price_preview("abcdef", "MATIC").as_deref(), Some("0.1 MATIC"));
    }

    #[test]
    fn unknown_network_has_placeholder() {
        assert_eq!(network_label(None, NetworkState::Unknown), "no network");
        assert_eq!(
            network_label(Some(NetworkName::Mainnet), NetworkState::WrongNetwork),
            "Mainnet"
        );
    }
}
