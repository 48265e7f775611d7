//! Mint and record-update sagas.
//!
//! A mint is two transactions: `register(name)` paying the length-based price,
//! then `setRecord(name, record)`. Each is confirmed before the next starts.
//! If the first succeeds and the second fails, the name stays registered with
//! an empty record; nothing is rolled back.
//!
//! Every send is gated on the session that admitted the workflow: once the
//! wallet changes chain, the remaining steps fail with `WrongNetwork`.

use std::time::Duration;

use tokio::sync::watch;

use kot_blockchain_core::{Address, ChainId, NetworkName, TxHash};

use crate::api::WorkflowError;
use crate::pricing::{MAX_NAME_LENGTH, MIN_NAME_LENGTH, Price, price_for_name};
use crate::registry::{RegistryClient, TransactionHandle};

/// Status of the single in-flight workflow slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation,
    Succeeded,
    Failed,
}

impl WorkflowStatus {
    /// While in flight, new submissions are refused.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            WorkflowStatus::Submitting | WorkflowStatus::AwaitingConfirmation
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum WorkflowKind {
    #[strum(serialize = "mint")]
    Mint,
    #[strum(serialize = "record update")]
    UpdateRecord,
}

/// Which transaction of a workflow an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum TxStage {
    #[strum(serialize = "register")]
    Register,
    #[strum(serialize = "setRecord")]
    SetRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Domain must be at least {min} characters long")]
    TooShort { min: usize, length: usize },

    #[error("Domain must be at most {max} characters long")]
    TooLong { max: usize, length: usize },

    #[error("Record must not be empty")]
    EmptyRecord,
}

/// User input for a mint or a record update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub name: String,
    pub record: String,
}

impl MintRequest {
    pub fn new(name: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record: record.into(),
        }
    }

    /// Checks the name length and returns the price to pay.
    pub fn validate_mint(&self) -> Result<Price, ValidationError> {
        let length = self.name.chars().count();
        if length > MAX_NAME_LENGTH {
            return Err(ValidationError::TooLong {
                max: MAX_NAME_LENGTH,
                length,
            });
        }
        price_for_name(&self.name).ok_or(ValidationError::TooShort {
            min: MIN_NAME_LENGTH,
            length,
        })
    }

    /// An update targets an existing name, so only the record is checked.
    pub fn validate_update(&self) -> Result<(), ValidationError> {
        if self.record.is_empty() {
            return Err(ValidationError::EmptyRecord);
        }
        Ok(())
    }
}

/// Progress reported while a saga runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Sent { stage: TxStage, hash: TxHash },
    Confirmed { stage: TxStage, hash: TxHash },
}

/// Result of a completed workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub kind: WorkflowKind,
    pub name: String,
    pub record: String,
    /// Price paid; `None` for record updates.
    pub price: Option<Price>,
    pub register_tx: Option<TxHash>,
    pub record_tx: TxHash,
}

/// Epoch of the session a workflow was admitted in.
///
/// The session worker bumps the watched value on every hard reset.
#[derive(Debug, Clone)]
pub struct SessionEpoch {
    admitted: u64,
    current: watch::Receiver<u64>,
}

impl SessionEpoch {
    pub fn new(current: watch::Receiver<u64>) -> Self {
        let admitted = *current.borrow();
        Self { admitted, current }
    }

    pub fn is_current(&self) -> bool {
        *self.current.borrow() == self.admitted
    }
}

/// Runs the transaction sequences against the registry.
#[derive(Debug, Clone)]
pub struct MintWorkflow {
    registry: RegistryClient,
    target: ChainId,
    confirmation_timeout: Option<Duration>,
}

impl MintWorkflow {
    pub fn new(
        registry: RegistryClient,
        target: ChainId,
        confirmation_timeout: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            target,
            confirmation_timeout,
        }
    }

    /// `register` then `setRecord`, each confirmed before moving on.
    pub async fn mint(
        &self,
        session: &SessionEpoch,
        from: Address,
        request: &MintRequest,
        price: Price,
        mut progress: impl FnMut(Progress) + Send,
    ) -> Result<MintOutcome, WorkflowError> {
        self.ensure_on_target(session).await?;
        tracing::info!(name = %request.name, %price, "registering name");
        let tx = self.registry.register(from, &request.name, price).await?;
        let register_tx = self.confirm(TxStage::Register, tx, &mut progress).await?;

        self.ensure_on_target(session).await?;
        tracing::info!(name = %request.name, "setting record");
        let tx = self
            .registry
            .set_record(from, &request.name, &request.record)
            .await?;
        let record_tx = self.confirm(TxStage::SetRecord, tx, &mut progress).await?;

        Ok(MintOutcome {
            kind: WorkflowKind::Mint,
            name: request.name.clone(),
            record: request.record.clone(),
            price: Some(price),
            register_tx: Some(register_tx),
            record_tx,
        })
    }

    /// `setRecord` alone on a name the caller already owns.
    pub async fn update_record(
        &self,
        session: &SessionEpoch,
        from: Address,
        request: &MintRequest,
        mut progress: impl FnMut(Progress) + Send,
    ) -> Result<MintOutcome, WorkflowError> {
        self.ensure_on_target(session).await?;
        tracing::info!(name = %request.name, "updating record");
        let tx = self
            .registry
            .set_record(from, &request.name, &request.record)
            .await?;
        let record_tx = self.confirm(TxStage::SetRecord, tx, &mut progress).await?;

        Ok(MintOutcome {
            kind: WorkflowKind::UpdateRecord,
            name: request.name.clone(),
            record: request.record.clone(),
            price: None,
            register_tx: None,
            record_tx,
        })
    }

    /// Refuses to send once the session was reset or the wallet left the target chain.
    async fn ensure_on_target(&self, session: &SessionEpoch) -> Result<(), WorkflowError> {
        let chain_id = self.registry.chain_id().await?;
        if session.is_current() && chain_id == self.target {
            return Ok(());
        }
        tracing::warn!(
            %chain_id,
            target = %self.target,
            "session changed under a running workflow"
        );
        Err(WorkflowError::WrongNetwork {
            expected: NetworkName::from_chain_id(self.target),
            actual: NetworkName::from_chain_id(chain_id),
        })
    }

    async fn confirm(
        &self,
        stage: TxStage,
        tx: TransactionHandle,
        progress: &mut (impl FnMut(Progress) + Send),
    ) -> Result<TxHash, WorkflowError> {
        let hash = tx.hash();
        progress(Progress::Sent { stage, hash });

        let receipt = tx.wait(self.confirmation_timeout).await?;
        if !receipt.is_success() {
            tracing::warn!(%stage, %hash, "transaction mined with failure status");
            return Err(WorkflowError::LogicalFailure { stage, hash });
        }

        progress(Progress::Confirmed { stage, hash });
        Ok(hash)
    }
}
