//! Error types surfaced by the runtime API.
//!
//! [`RuntimeError`] covers worker plumbing; [`WorkflowError`] is the
//! user-facing taxonomy every wallet, network, and registry failure is
//! classified into before it reaches a frontend.

use thiserror::Error;
use tokio::sync::oneshot;

use kot_blockchain_core::{NetworkName, ProviderError, TxHash};

use crate::registry::RegistryError;
use crate::workflow::{TxStage, ValidationError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a registry contract address before building")]
    MissingRegistry,

    #[error("session was reset while the request was in flight")]
    SessionReset,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl RuntimeError {
    /// The workflow-level cause, if this error carries one.
    pub fn as_workflow(&self) -> Option<&WorkflowError> {
        match self {
            RuntimeError::Workflow(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Get MetaMask -> https://metamask.io/")]
    ProviderUnavailable,

    #[error("request rejected in wallet")]
    UserRejected,

    #[error("Please connect to the {expected} (wallet is on {actual})")]
    WrongNetwork {
        expected: NetworkName,
        actual: NetworkName,
    },

    #[error("could not switch wallet to {network}: {reason}")]
    NetworkSetupFailed { network: NetworkName, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("chain error: {0}")]
    Chain(String),

    #[error("Transaction failed! Please try again ({stage} {hash})")]
    LogicalFailure { stage: TxStage, hash: TxHash },

    #[error("another transaction is still in progress")]
    Busy,

    #[error("connect a wallet first")]
    NotConnected,
}

impl WorkflowError {
    /// Rejections are deliberate user actions and are never shown as errors.
    pub fn is_silent(&self) -> bool {
        matches!(self, WorkflowError::UserRejected)
    }

    /// Message for the user, or `None` when the error should stay silent.
    pub fn user_message(&self) -> Option<String> {
        (!self.is_silent()).then(|| self.to_string())
    }
}

impl From<ProviderError> for WorkflowError {
    fn from(error: ProviderError) -> Self {
        if error.is_user_rejected() {
            WorkflowError::UserRejected
        } else if error.is_insufficient_funds() {
            WorkflowError::InsufficientFunds(error.to_string())
        } else if error == ProviderError::Unavailable {
            WorkflowError::ProviderUnavailable
        } else {
            WorkflowError::Chain(error.to_string())
        }
    }
}

impl From<RegistryError> for WorkflowError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::Provider(e) => e.into(),
            other => WorkflowError::Chain(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_blockchain_core::codes;

    #[test]
    fn provider_errors_are_classified() {
        assert_eq!(
            WorkflowError::from(ProviderError::rpc(codes::USER_REJECTED, "denied")),
            WorkflowError::UserRejected
        );
        assert!(matches!(
            WorkflowError::from(ProviderError::rpc(
                codes::SERVER_ERROR,
                "insufficient funds for gas * price + value"
            )),
            WorkflowError::InsufficientFunds(_)
        ));
        assert_eq!(
            WorkflowError::from(ProviderError::Unavailable),
            WorkflowError::ProviderUnavailable
        );
        assert!(matches!(
            WorkflowError::from(ProviderError::Transport("refused".into())),
            WorkflowError::Chain(_)
        ));
    }

    #[test]
    fn rejection_is_silent() {
        assert_eq!(WorkflowError::UserRejected.user_message(), None);
        assert!(WorkflowError::Busy.user_message().is_some());
        assert_eq!(
            WorkflowError::from(ValidationError::TooShort { min: 3, length: 1 }).user_message(),
            Some("Domain must be at least 3 characters long".to_string())
        );
    }
}
