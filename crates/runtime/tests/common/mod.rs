#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use kot_blockchain_core::{ChainId, MockWallet};
use kot_runtime::{Event, Runtime, RuntimeConfig, RuntimeHandle};
use tokio::sync::broadcast;

pub const WAIT: Duration = Duration::from_secs(5);

pub fn config() -> RuntimeConfig {
    RuntimeConfig {
        registry_address: Some(MockWallet::REGISTRY),
        refresh_delay: Duration::from_millis(10),
        receipt_poll_interval: Duration::from_millis(5),
        ..RuntimeConfig::default()
    }
}

pub fn mumbai_wallet() -> MockWallet {
    MockWallet::new(ChainId::POLYGON_MUMBAI)
}

/// Start a runtime over `wallet` and wait until the initial derivation ran.
pub async fn start(wallet: &MockWallet, config: RuntimeConfig) -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::builder()
        .config(config)
        .provider(Arc::new(wallet.clone()))
        .build()
        .await
        .expect("runtime should build");
    let handle = runtime.handle();
    handle.query_session().await.expect("worker should answer");
    (runtime, handle)
}

/// Receive events until one matches `predicate`.
pub async fn wait_for<T>(
    rx: &mut broadcast::Receiver<Event>,
    mut predicate: impl FnMut(&Event) -> Option<T>,
) -> T {
    tokio::time::timeout(WAIT, async {
        loop {
            let event = rx.recv().await.expect("event stream should stay open");
            if let Some(found) = predicate(&event) {
                return found;
            }
        }
    })
    .await
    .expect("expected event was not published in time")
}

/// Drain and return everything currently queued.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
