//! Connection, network guarding, and reset behaviour of the session worker.

mod common;

use kot_blockchain_core::{ChainDescriptor, ChainId, MockBehavior, MockWallet, NetworkName, methods};
use kot_runtime::{
    Event, ListingEvent, MintRequest, NetworkState, Runtime, RuntimeError, SessionEvent, Topic,
    WorkflowError, WorkflowStatus,
};

use common::{config, mumbai_wallet, start, wait_for};

fn workflow_error(error: RuntimeError) -> WorkflowError {
    match error {
        RuntimeError::Workflow(e) => e,
        other => panic!("expected workflow error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_provider_degrades_to_unavailable() {
    let runtime = Runtime::builder()
        .config(config())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let session = handle.query_session().await.unwrap();
    assert!(!session.provider_available);
    assert!(!session.is_connected());
    assert_eq!(session.network_state, NetworkState::Unknown);

    let err = workflow_error(handle.connect().await.unwrap_err());
    assert_eq!(err, WorkflowError::ProviderUnavailable);

    let err = workflow_error(
        handle
            .mint(MintRequest::new("valid", "record"))
            .await
            .unwrap_err(),
    );
    assert_eq!(err, WorkflowError::ProviderUnavailable);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn build_requires_registry_address() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(RuntimeError::MissingRegistry)));
}

#[tokio::test]
async fn startup_derives_authorized_account_without_prompting() {
    let wallet = mumbai_wallet().granted();
    let (_runtime, handle) = start(&wallet, config()).await;

    let session = handle.query_session().await.unwrap();
    assert_eq!(session.account, Some(MockWallet::ALICE));
    assert_eq!(session.chain_id, Some(ChainId::POLYGON_MUMBAI));
    assert_eq!(session.network, Some(NetworkName::PolygonMumbai));
    assert_eq!(session.network_state, NetworkState::Ready);
    assert_eq!(session.workflow_status, WorkflowStatus::Idle);
    assert_eq!(wallet.call_count(methods::REQUEST_ACCOUNTS), 0);
}

#[tokio::test]
async fn ungranted_wallet_starts_disconnected_until_connect() {
    let wallet = mumbai_wallet();
    let (_runtime, handle) = start(&wallet, config()).await;
    assert!(!handle.query_session().await.unwrap().is_connected());

    let account = handle.connect().await.unwrap();
    assert_eq!(account, Some(MockWallet::ALICE));
    assert_eq!(
        handle.query_session().await.unwrap().account,
        Some(MockWallet::ALICE)
    );
}

#[tokio::test]
async fn declined_connect_is_a_silent_no_op() {
    let wallet = mumbai_wallet().with_behavior(MockBehavior {
        reject_connect: true,
        ..MockBehavior::default()
    });
    let (_runtime, handle) = start(&wallet, config()).await;
    let mut session_rx = handle.subscribe(Topic::Session);

    assert_eq!(handle.connect().await.unwrap(), None);
    assert!(!handle.query_session().await.unwrap().is_connected());
    assert!(common::drain(&mut session_rx).is_empty());
}

#[tokio::test]
async fn wrong_network_blocks_mint_before_any_transaction() {
    let wallet = mumbai_wallet().granted().on_chain(ChainId(1));
    let (_runtime, handle) = start(&wallet, config()).await;

    let session = handle.query_session().await.unwrap();
    assert_eq!(session.network_state, NetworkState::WrongNetwork);
    assert_eq!(session.network, Some(NetworkName::Mainnet));

    let err = workflow_error(
        handle
            .mint(MintRequest::new("valid", "record"))
            .await
            .unwrap_err(),
    );
    assert_eq!(
        err,
        WorkflowError::WrongNetwork {
            expected: NetworkName::PolygonMumbai,
            actual: NetworkName::Mainnet,
        }
    );
    assert_eq!(wallet.call_count(methods::SEND_TRANSACTION), 0);

    let err = workflow_error(handle.refresh_listing().await.unwrap_err());
    assert!(matches!(err, WorkflowError::WrongNetwork { .. }));
}

#[tokio::test]
async fn switching_to_unknown_chain_adds_it_and_resets() {
    let wallet = mumbai_wallet()
        .granted()
        .on_chain(ChainId(1))
        .without_chain(ChainId::POLYGON_MUMBAI);
    let (_runtime, handle) = start(&wallet, config()).await;
    let mut session_rx = handle.subscribe(Topic::Session);

    handle.switch_network().await.unwrap();

    let epoch = wait_for(&mut session_rx, |event| match event {
        Event::Session(SessionEvent::HardReset { epoch, chain_id }) => {
            assert_eq!(*chain_id, ChainId::POLYGON_MUMBAI);
            Some(*epoch)
        }
        _ => None,
    })
    .await;
    assert_eq!(epoch, 1);
    assert_eq!(wallet.added_chains(), vec![ChainDescriptor::polygon_mumbai()]);

    let session = handle.query_session().await.unwrap();
    assert_eq!(session.network_state, NetworkState::Ready);
    assert_eq!(session.epoch, 1);
    assert_eq!(session.account, Some(MockWallet::ALICE));
}

#[tokio::test]
async fn failed_chain_setup_is_reported() {
    let wallet = mumbai_wallet()
        .on_chain(ChainId(1))
        .without_chain(ChainId::POLYGON_MUMBAI)
        .with_behavior(MockBehavior {
            fail_add_chain: true,
            ..MockBehavior::default()
        });
    let (_runtime, handle) = start(&wallet, config()).await;
    let mut session_rx = handle.subscribe(Topic::Session);

    let err = workflow_error(handle.switch_network().await.unwrap_err());
    assert!(matches!(err, WorkflowError::NetworkSetupFailed { .. }));

    wait_for(&mut session_rx, |event| match event {
        Event::Session(SessionEvent::NetworkSetupFailed { .. }) => Some(()),
        _ => None,
    })
    .await;
    assert_eq!(
        handle.query_session().await.unwrap().network_state,
        NetworkState::WrongNetwork
    );
}

#[tokio::test]
async fn switch_on_target_chain_is_a_no_op() {
    let wallet = mumbai_wallet().granted();
    let (_runtime, handle) = start(&wallet, config()).await;

    handle.switch_network().await.unwrap();
    assert_eq!(wallet.call_count(methods::SWITCH_CHAIN), 0);
}

#[tokio::test]
async fn chain_change_clears_listing_and_rederives() {
    let wallet = mumbai_wallet().granted();
    wallet.seed_name("alpha", MockWallet::ALICE, "one");
    let (_runtime, handle) = start(&wallet, config()).await;
    assert_eq!(handle.refresh_listing().await.unwrap().len(), 1);

    let mut listing_rx = handle.subscribe(Topic::Listing);
    let mut session_rx = handle.subscribe(Topic::Session);
    wallet.emit_chain_changed(ChainId(1));

    wait_for(&mut listing_rx, |event| match event {
        Event::Listing(ListingEvent::Cleared) => Some(()),
        _ => None,
    })
    .await;
    wait_for(&mut session_rx, |event| match event {
        Event::Session(SessionEvent::Changed(snapshot)) if snapshot.epoch == 1 => {
            assert_eq!(snapshot.network_state, NetworkState::WrongNetwork);
            Some(())
        }
        _ => None,
    })
    .await;

    assert!(handle.query_listing().await.unwrap().is_empty());
}

#[tokio::test]
async fn accounts_change_swaps_account_without_reset() {
    let wallet = mumbai_wallet().granted();
    let (_runtime, handle) = start(&wallet, config()).await;
    let mut session_rx = handle.subscribe(Topic::Session);

    wallet.emit_accounts_changed(vec![MockWallet::BOB]);

    let snapshot = wait_for(&mut session_rx, |event| match event {
        Event::Session(SessionEvent::Changed(snapshot)) => Some(snapshot.clone()),
        _ => None,
    })
    .await;
    assert_eq!(snapshot.account, Some(MockWallet::BOB));
    assert_eq!(snapshot.epoch, 0);
    assert_eq!(snapshot.network_state, NetworkState::Ready);

    wallet.emit_accounts_changed(vec![]);
    let snapshot = wait_for(&mut session_rx, |event| match event {
        Event::Session(SessionEvent::Changed(snapshot)) => Some(snapshot.clone()),
        _ => None,
    })
    .await;
    assert!(!snapshot.is_connected());
}

#[tokio::test]
async fn shutdown_stops_worker() {
    let wallet = mumbai_wallet();
    let (runtime, handle) = start(&wallet, config()).await;
    runtime.shutdown().await.unwrap();

    assert!(matches!(
        handle.query_session().await,
        Err(RuntimeError::CommandChannelClosed) | Err(RuntimeError::ReplyChannelClosed(_))
    ));
}
