//! Wallet provider abstraction.
//!
//! A [`WalletProvider`] is the EIP-1193 surface of a wallet: one generic
//! `request` entry point plus a stream of provider events. Everything above it
//! (session, network guard, registry calls) is expressed in terms of these
//! two operations.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use alloy_primitives::Address;

use crate::types::ChainId;

/// JSON-RPC method names, reproduced verbatim for wallet compatibility.
pub mod methods {
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const CHAIN_ID: &str = "eth_chainId";
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    pub const ADD_CHAIN: &str = "wallet_addEthereumChain";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const CALL: &str = "eth_call";
    pub const TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";

    /// Methods that may open a wallet prompt and wait on the user.
    pub fn prompts_user(method: &str) -> bool {
        matches!(
            method,
            REQUEST_ACCOUNTS | SWITCH_CHAIN | ADD_CHAIN | SEND_TRANSACTION
        )
    }
}

/// EIP-1193 / JSON-RPC error codes the client distinguishes.
pub mod codes {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    pub const SERVER_ERROR: i64 = -32000;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INTERNAL_ERROR: i64 = -32603;
}

// ============================================================================
// Error Types
// ============================================================================

/// Provider layer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("no wallet provider available")]
    Unavailable,

    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("provider transport error: {0}")]
    Transport(String),

    #[error("malformed provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        ProviderError::Rpc {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The user dismissed a wallet prompt.
    pub fn is_user_rejected(&self) -> bool {
        self.code() == Some(codes::USER_REJECTED)
    }

    /// `wallet_switchEthereumChain` targeted a chain the wallet does not know.
    ///
    /// Some mobile wallets wrap 4902 inside an internal error, so the message
    /// is checked as well.
    pub fn is_unrecognized_chain(&self) -> bool {
        match self {
            ProviderError::Rpc { code, message } => {
                *code == codes::UNRECOGNIZED_CHAIN
                    || (*code == codes::INTERNAL_ERROR
                        && message.to_ascii_lowercase().contains("unrecognized chain"))
            }
            _ => false,
        }
    }

    pub fn is_insufficient_funds(&self) -> bool {
        match self {
            ProviderError::Rpc { message, .. } => {
                message.to_ascii_lowercase().contains("insufficient funds")
            }
            _ => false,
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Events pushed by the provider outside of any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// `chainChanged`: the wallet's active chain changed.
    ChainChanged(ChainId),
    /// `accountsChanged`: the exposed account list changed (empty = locked or revoked).
    AccountsChanged(Vec<Address>),
}

impl ProviderEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderEvent::ChainChanged(_) => "chainChanged",
            ProviderEvent::AccountsChanged(_) => "accountsChanged",
        }
    }
}

// ============================================================================
// Layer 0: Provider
// ============================================================================

/// EIP-1193 request/event surface of a wallet.
///
/// Requests may suspend for as long as the user takes to answer a wallet
/// prompt; callers must not assume bounded latency.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Issue a JSON-RPC request (`params` is the positional parameter array).
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Subscribe to provider events for the lifetime of the receiver.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str {
        "wallet"
    }
}
