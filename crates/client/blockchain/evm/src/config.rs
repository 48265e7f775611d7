//! Wallet bridge configuration.

use std::env;
use std::time::Duration;

/// Default endpoint of Frame's local provider.
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:1248";

/// Configuration for [`crate::JsonRpcWallet`].
#[derive(Debug, Clone)]
pub struct EvmConfig {
    /// JSON-RPC endpoint of the wallet's provider.
    pub wallet_url: String,

    /// How often the watcher re-reads chain id and accounts.
    pub poll_interval: Duration,

    /// Optional timeout for requests that never prompt the user.
    ///
    /// Prompts (`eth_requestAccounts`, `eth_sendTransaction`, chain
    /// switch/add) always wait for the user.
    pub request_timeout: Option<Duration>,
}

impl EvmConfig {
    pub fn new(wallet_url: impl Into<String>) -> Self {
        Self {
            wallet_url: wallet_url.into(),
            poll_interval: Duration::from_millis(1000),
            request_timeout: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `KOT_WALLET_URL` - Wallet JSON-RPC endpoint (default: http://127.0.0.1:1248)
    /// - `KOT_WALLET_POLL_MS` - Chain/account polling interval (default: 1000)
    /// - `KOT_WALLET_TIMEOUT_SECS` - Timeout for non-prompting reads (default: none)
    pub fn from_env() -> Result<Self, String> {
        let mut config =
            Self::new(env::var("KOT_WALLET_URL").unwrap_or_else(|_| DEFAULT_WALLET_URL.into()));

        if let Ok(raw) = env::var("KOT_WALLET_POLL_MS") {
            let millis = raw
                .parse::<u64>()
                .map_err(|_| format!("Invalid KOT_WALLET_POLL_MS: {raw}"))?;
            config.poll_interval = Duration::from_millis(millis.max(50));
        }

        if let Ok(raw) = env::var("KOT_WALLET_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| format!("Invalid KOT_WALLET_TIMEOUT_SECS: {raw}"))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let url = &self.wallet_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("Invalid wallet URL format: {url}"));
        }
        if self.poll_interval.is_zero() {
            return Err("Poll interval must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WALLET_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        assert!(EvmConfig::new("ws://127.0.0.1:1248").validate().is_err());
        assert!(EvmConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let config = EvmConfig::default().with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
