//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading, wallet detection, and runtime setup that
//! can be reused by the terminal UI or any other front-end crate.
pub mod builder;
pub mod config;
pub mod wallet;

pub use builder::{RuntimeSetup, SetupBuilder};
pub use config::{ClientConfig, TargetChain};
pub use wallet::{DetectedWallet, detect_wallet};
