//! EVM wallet bridge for the .kot client.
//!
//! Desktop wallets such as Frame expose their EIP-1193 provider as a local
//! JSON-RPC endpoint. [`JsonRpcWallet`] forwards requests to that endpoint and
//! turns chain/account polling into `chainChanged` / `accountsChanged` events,
//! so the rest of the client sees the same surface a browser-injected
//! provider would offer.
//!
//! ```text
//! kot-runtime (ProviderGateway) → JsonRpcWallet → HTTP JSON-RPC → wallet
//!                                      ↑
//!                                 ChainWatcher (poll → ProviderEvent)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use kot_blockchain_evm::{EvmConfig, JsonRpcWallet};
//!
//! let config = EvmConfig::from_env()?;
//! if let Some(wallet) = JsonRpcWallet::detect(config).await {
//!     let _watcher = wallet.spawn_watcher();
//!     // hand `wallet` to the runtime as an Arc<dyn WalletProvider>
//! }
//! ```

pub mod client;
pub mod config;
pub mod watcher;

pub use client::JsonRpcWallet;
pub use config::EvmConfig;
pub use watcher::WatchState;
