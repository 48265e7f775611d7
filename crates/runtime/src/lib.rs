//! Session runtime for the .kot naming client.
//!
//! This crate turns a raw [`kot_blockchain_core::WalletProvider`] into a
//! serialized session: account connection, network guarding, the mint and
//! record-update sagas, and the listing cache. Frontends embed [`Runtime`] and
//! drive it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`gateway`], [`network`], [`registry`] wrap wallet and contract access
//! - [`workflow`], [`pricing`], [`listing`], [`session`] hold domain state
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod gateway;
pub mod listing;
pub mod network;
pub mod pricing;
pub mod registry;
pub mod runtime;
pub mod session;
pub mod workflow;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle, WorkflowError};
pub use events::{Event, EventBus, ListingEvent, SessionEvent, Topic, WorkflowEvent};
pub use gateway::{ProviderGateway, SwitchError};
pub use listing::{ListingCache, MintRecord};
pub use network::{NetworkGuard, NetworkState, SwitchOutcome, request_switch};
pub use pricing::{MAX_NAME_LENGTH, MIN_NAME_LENGTH, Price, price_for_length, price_for_name};
pub use registry::{NameEntry, RegistryClient, RegistryError, TransactionHandle};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::{SessionSnapshot, SessionState};
pub use workflow::{
    MintOutcome, MintRequest, MintWorkflow, Progress, SessionEpoch, TxStage, ValidationError,
    WorkflowKind, WorkflowStatus,
};
