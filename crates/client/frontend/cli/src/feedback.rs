//! Replies of commands the UI fires in the background.
//!
//! Workflow failures and listing errors already arrive as runtime events and
//! are logged by the consumer. Only failures the runtime reports solely to the
//! caller are turned into messages here.

use kot_blockchain_core::Address;
use kot_frontend_core::{MessageEntry, MessageLevel, format};
use kot_runtime::{MintOutcome, MintRecord, Result, RuntimeError, WorkflowError};

#[derive(Debug)]
pub enum CommandFeedback {
    Connect(Result<Option<Address>>),
    SwitchNetwork(Result<()>),
    Workflow(Result<MintOutcome>),
    Refresh(Result<Vec<MintRecord>>),
}

impl CommandFeedback {
    /// Message to show for this reply, if the runtime did not announce it already.
    pub fn message(&self) -> Option<MessageEntry> {
        match self {
            CommandFeedback::Connect(Ok(Some(account))) => Some(MessageEntry::new(
                format!("Connected {}", format::short_address(account)),
                MessageLevel::Success,
            )),
            CommandFeedback::Connect(Ok(None)) => None,
            CommandFeedback::Connect(Err(error)) => unannounced(error, |_| true),
            CommandFeedback::SwitchNetwork(Ok(())) => None,
            CommandFeedback::SwitchNetwork(Err(error)) => unannounced(error, |e| {
                matches!(e, WorkflowError::ProviderUnavailable)
            }),
            CommandFeedback::Workflow(Ok(_)) => None,
            CommandFeedback::Workflow(Err(error)) => unannounced(error, |_| false),
            CommandFeedback::Refresh(Ok(_)) => None,
            CommandFeedback::Refresh(Err(error)) => unannounced(error, |e| {
                matches!(e, WorkflowError::WrongNetwork { .. })
            }),
        }
    }
}

/// Workflow errors selected by `caller_only` become messages; runtime
/// failures always do, since nothing else reports them.
fn unannounced(
    error: &RuntimeError,
    caller_only: impl Fn(&WorkflowError) -> bool,
) -> Option<MessageEntry> {
    match error {
        RuntimeError::Workflow(workflow) => {
            if !caller_only(workflow) {
                return None;
            }
            workflow
                .user_message()
                .map(|text| MessageEntry::new(text, MessageLevel::Error))
        }
        RuntimeError::SessionReset => None,
        other => Some(MessageEntry::new(other.to_string(), MessageLevel::Error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_blockchain_core::NetworkName;

    #[test]
    fn connect_failures_are_reported() {
        let feedback = CommandFeedback::Connect(Err(WorkflowError::ProviderUnavailable.into()));
        let entry = feedback.message().unwrap();
        assert_eq!(entry.text, "Get MetaMask -> https://metamask.io/");
        assert_eq!(entry.level, MessageLevel::Error);
    }

    #[test]
    fn rejected_connect_is_silent() {
        let feedback = CommandFeedback::Connect(Err(WorkflowError::UserRejected.into()));
        assert!(feedback.message().is_none());
        assert!(CommandFeedback::Connect(Ok(None)).message().is_none());
    }

    #[test]
    fn workflow_errors_are_left_to_events() {
        let feedback = CommandFeedback::Workflow(Err(WorkflowError::Busy.into()));
        assert!(feedback.message().is_none());
        let feedback =
            CommandFeedback::SwitchNetwork(Err(WorkflowError::NetworkSetupFailed {
                network: NetworkName::PolygonMumbai,
                reason: "denied".into(),
            }
            .into()));
        assert!(feedback.message().is_none());
    }

    #[test]
    fn refresh_on_wrong_network_is_reported() {
        let feedback = CommandFeedback::Refresh(Err(WorkflowError::WrongNetwork {
            expected: NetworkName::PolygonMumbai,
            actual: NetworkName::Mainnet,
        }
        .into()));
        assert!(feedback.message().is_some());
    }

    #[test]
    fn runtime_failures_are_always_reported() {
        let feedback = CommandFeedback::Workflow(Err(RuntimeError::CommandChannelClosed));
        assert!(feedback.message().is_some());
    }
}
