//! Typed event payloads grouped by topic.

use kot_blockchain_core::{ChainId, TxHash};

use crate::api::WorkflowError;
use crate::listing::MintRecord;
use crate::session::SessionSnapshot;
use crate::workflow::{MintOutcome, TxStage, WorkflowKind, WorkflowStatus};

/// Session lifecycle events.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Account, network, or workflow status changed.
    Changed(SessionSnapshot),

    /// The wallet switched chains; all derived state was discarded.
    HardReset { epoch: u64, chain_id: ChainId },

    /// A switch or add-chain request failed.
    NetworkSetupFailed { error: WorkflowError },
}

/// Mint / record-update progress.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    StatusChanged {
        kind: WorkflowKind,
        name: String,
        status: WorkflowStatus,
    },

    TransactionSent {
        stage: TxStage,
        hash: TxHash,
        /// Block explorer page for the transaction, if the chain has one.
        explorer_url: Option<String>,
    },

    TransactionConfirmed { stage: TxStage, hash: TxHash },

    Completed(MintOutcome),

    Failed {
        kind: WorkflowKind,
        name: String,
        error: WorkflowError,
    },

    /// Submission refused before any wallet request was made.
    Rejected {
        kind: WorkflowKind,
        error: WorkflowError,
    },
}

/// Listing cache events.
#[derive(Debug, Clone)]
pub enum ListingEvent {
    Refreshed { records: Vec<MintRecord> },
    RefreshFailed { error: WorkflowError },
    Cleared,
}
