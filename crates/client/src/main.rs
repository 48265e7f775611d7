//! .kot name registry client binary.
//!
//! Composition root: loads configuration, builds the runtime through
//! `kot-bootstrap`, and hands a `RuntimeHandle` to the selected frontend.
//!
//! # Features
//!
//! - `frontend-cli`: Terminal UI (default)
//! - `demo-wallet`: in-memory wallet instead of a wallet bridge
//!
//! # Examples
//!
//! ```bash
//! # Frame or another EIP-1193 bridge listening on KOT_WALLET_URL
//! KOT_CONTRACT_ADDRESS=0x... cargo run -p kot-client
//!
//! # No wallet needed
//! cargo run -p kot-client --features demo-wallet
//! ```

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    #[cfg(feature = "frontend-cli")]
    {
        run_cli().await?;
    }

    #[cfg(not(feature = "frontend-cli"))]
    {
        compile_error!("At least one frontend feature must be enabled (frontend-cli)");
    }

    Ok(())
}

/// Run the CLI frontend.
#[cfg(feature = "frontend-cli")]
async fn run_cli() -> Result<()> {
    use kot_bootstrap::SetupBuilder;
    use kot_client::Client;
    use kot_frontend_cli::{CliConfig, CliFrontend, FrontendConfig, logging};

    // 1. Load configuration from environment
    let client_config = load_config()?;
    let frontend_config = FrontendConfig::from_env();
    let cli_config = CliConfig::from_env();

    // 2. Setup logging
    logging::setup_logging(&client_config.session_id)?;

    tracing::info!("Starting .kot client");
    tracing::info!("Session ID: {:?}", client_config.session_id);
    tracing::info!(
        "Target network: {}",
        client_config.runtime.target_chain.chain_name
    );
    tracing::info!("Wallet endpoint: {}", client_config.wallet.wallet_url);

    // 3. Build Runtime (independent layer)
    tracing::debug!("Building runtime...");
    let setup = demo_wallet(SetupBuilder::new(client_config)).build().await?;

    tracing::info!("Runtime built successfully");

    // 4. Build Frontend (independent layer)
    let frontend = CliFrontend::new(frontend_config, cli_config);

    // 5. Build and run
    let client = Client::builder()
        .runtime(setup.runtime)
        .frontend(frontend)
        .watcher(setup.watcher)
        .build()?;

    tracing::info!("Client assembled, starting...");
    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}

#[cfg(not(feature = "demo-wallet"))]
fn load_config() -> Result<kot_bootstrap::ClientConfig> {
    kot_bootstrap::ClientConfig::from_env()
}

/// The demo wallet only knows its own registry address.
#[cfg(feature = "demo-wallet")]
fn load_config() -> Result<kot_bootstrap::ClientConfig> {
    use kot_blockchain_core::MockWallet;

    let mut config = kot_bootstrap::ClientConfig::from_env()
        .unwrap_or_else(|_| kot_bootstrap::ClientConfig::new(MockWallet::REGISTRY));
    config.runtime.registry_address = Some(MockWallet::REGISTRY);
    Ok(config)
}

#[cfg(not(feature = "demo-wallet"))]
fn demo_wallet(builder: kot_bootstrap::SetupBuilder) -> kot_bootstrap::SetupBuilder {
    builder
}

/// Starts on Ethereum mainnet so the network switch is part of the demo.
#[cfg(feature = "demo-wallet")]
fn demo_wallet(builder: kot_bootstrap::SetupBuilder) -> kot_bootstrap::SetupBuilder {
    use std::sync::Arc;

    use kot_blockchain_core::{ChainId, MockWallet};

    let target = builder.config().runtime.target_chain.chain_id;
    let wallet = MockWallet::new(target)
        .with_accounts(vec![MockWallet::ALICE])
        .on_chain(ChainId::new(1));
    wallet.seed_name("satoshi", MockWallet::BOB, "@nakamoto");
    wallet.seed_name("kotfan", MockWallet::ALICE, "");

    tracing::info!("Using the in-memory demo wallet");
    builder.provider(Arc::new(wallet))
}
