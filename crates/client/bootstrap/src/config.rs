//! Client configuration structures and loaders.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

use kot_blockchain_core::{Address, ChainDescriptor};
use kot_blockchain_evm::EvmConfig;
use kot_runtime::RuntimeConfig;

/// Chain presets the registry is deployed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetChain {
    #[default]
    Mumbai,
    Polygon,
}

impl TargetChain {
    pub fn descriptor(self) -> ChainDescriptor {
        match self {
            TargetChain::Mumbai => ChainDescriptor::polygon_mumbai(),
            TargetChain::Polygon => ChainDescriptor::polygon_mainnet(),
        }
    }
}

impl FromStr for TargetChain {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mumbai" | "polygon-mumbai" => Ok(TargetChain::Mumbai),
            "polygon" | "matic" => Ok(TargetChain::Polygon),
            other => Err(anyhow!("unknown target chain {other:?} (expected mumbai or polygon)")),
        }
    }
}

/// Configuration required to bootstrap the runtime and a front-end.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub wallet: EvmConfig,
    pub runtime: RuntimeConfig,
    /// Names the log directory; generated from the start time when unset.
    pub session_id: Option<String>,
}

impl ClientConfig {
    pub fn new(registry_address: Address) -> Self {
        Self {
            wallet: EvmConfig::default(),
            runtime: RuntimeConfig {
                registry_address: Some(registry_address),
                ..RuntimeConfig::default()
            },
            session_id: None,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `KOT_CONTRACT_ADDRESS` - Registry contract address (required)
    /// - `KOT_TARGET_CHAIN` - `mumbai` (default) or `polygon`
    /// - `KOT_RPC_URL` / `KOT_EXPLORER_URL` - Override the preset's endpoints
    /// - `KOT_REFRESH_DELAY_MS` - Delay before re-listing after a mint (default: 2000)
    /// - `KOT_RECEIPT_POLL_MS` - Receipt polling interval (default: 1000)
    /// - `KOT_CONFIRMATION_TIMEOUT_SECS` - Give up waiting for receipts (default: never)
    /// - `KOT_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `KOT_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `KOT_SESSION_ID` - Session identifier for the log directory
    /// - wallet variables, see [`EvmConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let raw_address =
            env::var("KOT_CONTRACT_ADDRESS").context("KOT_CONTRACT_ADDRESS is not set")?;
        let registry_address = Address::from_str(raw_address.trim())
            .with_context(|| format!("Invalid KOT_CONTRACT_ADDRESS: {raw_address}"))?;

        let mut config = Self::new(registry_address);
        config.wallet = EvmConfig::from_env().map_err(|e| anyhow!(e))?;

        let target = match env::var("KOT_TARGET_CHAIN") {
            Ok(raw) => raw.parse::<TargetChain>()?,
            Err(_) => TargetChain::default(),
        };
        let mut descriptor = target.descriptor();
        if let Ok(url) = env::var("KOT_RPC_URL") {
            descriptor.rpc_urls = vec![url];
        }
        if let Ok(url) = env::var("KOT_EXPLORER_URL") {
            descriptor.block_explorer_urls = vec![url];
        }
        config.runtime.target_chain = descriptor;

        if let Some(ms) = read_env::<u64>("KOT_REFRESH_DELAY_MS")? {
            config.runtime.refresh_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("KOT_RECEIPT_POLL_MS")? {
            config.runtime.receipt_poll_interval = Duration::from_millis(ms.max(10));
        }
        if let Some(secs) = read_env::<u64>("KOT_CONFIRMATION_TIMEOUT_SECS")? {
            config.runtime.confirmation_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(capacity) = read_env::<usize>("KOT_EVENT_BUFFER")? {
            config.runtime.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("KOT_COMMAND_BUFFER")? {
            config.runtime.command_buffer_size = capacity.max(1);
        }

        config.session_id = env::var("KOT_SESSION_ID").ok();

        Ok(config)
    }
}

/// Unset is `None`; set but unparsable is an error.
fn read_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {key}: {raw}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_blockchain_core::ChainId;

    #[test]
    fn target_chain_presets_parse() {
        assert_eq!("Mumbai".parse::<TargetChain>().unwrap(), TargetChain::Mumbai);
        assert_eq!(
            "polygon".parse::<TargetChain>().unwrap().descriptor().chain_id,
            ChainId::POLYGON_MAINNET
        );
        assert!("goerli".parse::<TargetChain>().is_err());
    }

    #[test]
    fn new_config_targets_mumbai_with_registry() {
        let address = Address::repeat_byte(0x42);
        let config = ClientConfig::new(address);
        assert_eq!(config.runtime.registry_address, Some(address));
        assert_eq!(config.runtime.target_chain, ChainDescriptor::polygon_mumbai());
        assert_eq!(config.runtime.refresh_delay, Duration::from_secs(2));
    }
}
