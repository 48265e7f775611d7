//! Wallet and registry abstraction layer for the .kot naming client.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: IKotRegistry (contract ABI, consumed via eth_call / eth_sendTransaction)
//!
//! Layer 0: WalletProvider (EIP-1193 request/event surface)
//! ```
//!
//! - **Layer 0 (Provider)**: raw wallet requests and events, no registry knowledge
//! - **Layer 1 (Contract)**: typed calls into the naming contract, encoded with `sol!`
//!
//! Higher layers (session, network guard, mint workflow) live in `kot-runtime`
//! and only ever talk to a [`WalletProvider`].
//!
//! # Usage
//!
//! ```ignore
//! use kot_blockchain_core::{WalletProvider, methods};
//!
//! async fn current_chain(wallet: &dyn WalletProvider) -> Result<ChainId, ProviderError> {
//!     let raw = wallet.request(methods::CHAIN_ID, serde_json::json!([])).await?;
//!     ...
//! }
//! ```

pub mod contract;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use contract::IKotRegistry;

pub use traits::{ProviderError, ProviderEvent, WalletProvider, codes, methods};

pub use types::{
    CallRequest, ChainDescriptor, ChainId, ChainIdParseError, NativeCurrency, NetworkName,
    Receipt, ReceiptStatus, TransactionRequest, TxHash, parse_quantity,
};

// Primitive types shared by every layer above.
pub use alloy_primitives::{Address, Bytes, U256};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBehavior, MockWallet};
