//! Common types for wallet and registry interactions.

use std::fmt;

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Transaction hash as returned by `eth_sendTransaction`.
pub type TxHash = B256;

/// Numeric EVM chain identifier.
///
/// Wallets exchange chain ids as `0x`-prefixed hex strings; [`ChainId`]
/// serializes to that form and accepts either hex strings or plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chain id: {0:?}")]
pub struct ChainIdParseError(pub String);

impl ChainId {
    pub const POLYGON_MAINNET: ChainId = ChainId(137);
    pub const POLYGON_MUMBAI: ChainId = ChainId(80_001);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Hex form used on the wallet boundary (e.g. `0x13881`).
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parses `0x`-prefixed hex or a plain decimal string.
    pub fn parse(raw: &str) -> Result<Self, ChainIdParseError> {
        let trimmed = raw.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|_| ChainIdParseError(raw.to_string()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => ChainId::parse(&text).map_err(serde::de::Error::custom),
            Raw::Number(n) => Ok(ChainId(n)),
        }
    }
}

/// Display names for the chain ids a wallet is likely to report.
///
/// Lookup is total: anything outside the table is [`NetworkName::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum NetworkName {
    #[strum(serialize = "Mainnet")]
    Mainnet,
    #[strum(serialize = "Ropsten")]
    Ropsten,
    #[strum(serialize = "Kovan")]
    Kovan,
    #[strum(serialize = "Rinkeby")]
    Rinkeby,
    #[strum(serialize = "Goerli")]
    Goerli,
    #[strum(serialize = "BSC Testnet")]
    BscTestnet,
    #[strum(serialize = "BSC Mainnet")]
    BscMainnet,
    #[strum(serialize = "Polygon Mainnet")]
    PolygonMainnet,
    #[strum(serialize = "Polygon Mumbai Testnet")]
    PolygonMumbai,
    #[strum(serialize = "AVAX Mainnet")]
    AvaxMainnet,
    #[strum(serialize = "Unrecognized network")]
    Unknown,
}

impl NetworkName {
    pub fn from_chain_id(chain_id: ChainId) -> Self {
        match chain_id.value() {
            0x1 => NetworkName::Mainnet,
            0x3 => NetworkName::Ropsten,
            0x2a => NetworkName::Kovan,
            0x4 => NetworkName::Rinkeby,
            0x5 => NetworkName::Goerli,
            0x61 => NetworkName::BscTestnet,
            0x38 => NetworkName::BscMainnet,
            0x89 => NetworkName::PolygonMainnet,
            0x13881 => NetworkName::PolygonMumbai,
            0xa86a => NetworkName::AvaxMainnet,
            _ => NetworkName::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != NetworkName::Unknown
    }
}

/// Native currency metadata for `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Full chain descriptor, serialized verbatim as the `wallet_addEthereumChain`
/// parameter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl ChainDescriptor {
    /// Polygon Mumbai testnet, where the .kot registry is deployed.
    pub fn polygon_mumbai() -> Self {
        Self {
            chain_id: ChainId::POLYGON_MUMBAI,
            chain_name: "Polygon Mumbai Testnet".to_string(),
            rpc_urls: vec!["https://rpc-mumbai.maticvigil.com/".to_string()],
            native_currency: NativeCurrency {
                name: "Mumbai Matic".to_string(),
                symbol: "MATIC".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec!["https://mumbai.polygonscan.com/".to_string()],
        }
    }

    pub fn polygon_mainnet() -> Self {
        Self {
            chain_id: ChainId::POLYGON_MAINNET,
            chain_name: "Polygon Mainnet".to_string(),
            rpc_urls: vec!["https://polygon-rpc.com/".to_string()],
            native_currency: NativeCurrency {
                name: "MATIC".to_string(),
                symbol: "MATIC".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec!["https://polygonscan.com/".to_string()],
        }
    }

    pub fn network_name(&self) -> NetworkName {
        NetworkName::from_chain_id(self.chain_id)
    }

    /// Explorer page for a transaction, if the descriptor lists an explorer.
    pub fn explorer_tx_url(&self, hash: &TxHash) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), hash))
    }
}

/// Inclusion outcome carried by a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// Status code 1.
    Success,
    /// Status code 0: mined, but execution reverted.
    Failure,
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReceipt", into = "RawReceipt")]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl TryFrom<RawReceipt> for Receipt {
    type Error = String;

    fn try_from(raw: RawReceipt) -> Result<Self, Self::Error> {
        let status = match raw.status.as_deref().map(parse_quantity) {
            Some(Some(1)) => ReceiptStatus::Success,
            Some(Some(0)) => ReceiptStatus::Failure,
            other => return Err(format!("unexpected receipt status: {other:?}")),
        };
        Ok(Receipt {
            transaction_hash: raw.transaction_hash,
            block_number: raw.block_number.as_deref().and_then(parse_quantity),
            status,
        })
    }
}

impl From<Receipt> for RawReceipt {
    fn from(receipt: Receipt) -> Self {
        let status = match receipt.status {
            ReceiptStatus::Success => "0x1",
            ReceiptStatus::Failure => "0x0",
        };
        RawReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|n| format!("{n:#x}")),
            status: Some(status.to_string()),
        }
    }
}

/// Parameter object for `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    pub data: Bytes,
}

/// Parameter object for `eth_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub to: Address,
    pub data: Bytes,
}

/// Parses a JSON-RPC quantity (`0x`-prefixed hex).
pub fn parse_quantity(raw: &str) -> Option<u64> {
    let hex = raw.strip_prefix("0x")?;
    if hex.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_round_trips_through_hex() {
        let id = ChainId::parse("0x13881").unwrap();
        assert_eq!(id, ChainId::POLYGON_MUMBAI);
        assert_eq!(id.to_hex(), "0x13881");
        assert_eq!(ChainId::parse("137").unwrap(), ChainId::POLYGON_MAINNET);
        assert!(ChainId::parse("0xzz").is_err());
    }

    #[test]
    fn network_table_defaults_to_unknown() {
        assert_eq!(
            NetworkName::from_chain_id(ChainId(0x13881)).to_string(),
            "Polygon Mumbai Testnet"
        );
        assert_eq!(NetworkName::from_chain_id(ChainId(0x89)), NetworkName::PolygonMainnet);
        assert_eq!(NetworkName::from_chain_id(ChainId(31337)), NetworkName::Unknown);
        assert!(!NetworkName::Unknown.is_known());
    }

    #[test]
    fn descriptor_uses_wallet_field_names() {
        let json = serde_json::to_value(ChainDescriptor::polygon_mumbai()).unwrap();
        assert_eq!(json["chainId"], "0x13881");
        assert_eq!(json["chainName"], "Polygon Mumbai Testnet");
        assert_eq!(json["rpcUrls"][0], "https://rpc-mumbai.maticvigil.com/");
        assert_eq!(json["nativeCurrency"]["symbol"], "MATIC");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["blockExplorerUrls"][0], "https://mumbai.polygonscan.com/");
    }

    #[test]
    fn receipt_status_is_decoded_from_quantity() {
        let json = serde_json::json!({
            "transactionHash": format!("0x{}", "ab".repeat(32)),
            "blockNumber": "0x10",
            "status": "0x0",
        });
        let receipt: Receipt = serde_json::from_value(json).unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Failure);
        assert_eq!(receipt.block_number, Some(16));
        assert!(!receipt.is_success());
    }

    #[test]
    fn explorer_link_joins_without_double_slash() {
        let descriptor = ChainDescriptor::polygon_mumbai();
        let url = descriptor.explorer_tx_url(&TxHash::ZERO).unwrap();
        assert!(url.starts_with("https://mumbai.polygonscan.com/tx/0x"));
    }
}
