//! Utilities for reacting to runtime events inside UI layers.
use kot_runtime::{Event, ListingEvent, SessionEvent, TxStage, WorkflowEvent, WorkflowKind};

use crate::config::MessageConfig;
use crate::format;
use crate::message::{MessageEntry, MessageLevel, MessageLog};
use crate::view_model::ViewModel;

#[derive(Clone, Copy, Debug, Default)]
pub struct EventImpact {
    pub requires_redraw: bool,
}

impl EventImpact {
    pub const fn none() -> Self {
        Self {
            requires_redraw: false,
        }
    }

    pub const fn redraw() -> Self {
        Self {
            requires_redraw: true,
        }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            requires_redraw: self.requires_redraw || other.requires_redraw,
        }
    }
}

pub trait EventConsumer {
    fn on_event(&mut self, event: &Event) -> EventImpact;
    fn message_log(&self) -> &MessageLog;
    fn message_log_mut(&mut self) -> &mut MessageLog;
    fn take_message_log(self) -> MessageLog
    where
        Self: Sized;
}

/// Default consumer: keeps a [`ViewModel`] current and turns events into
/// user-facing messages.
#[derive(Clone, Debug)]
pub struct SessionConsumer {
    view: ViewModel,
    messages: MessageLog,
    config: MessageConfig,
}

impl SessionConsumer {
    pub fn new(config: MessageConfig) -> Self {
        Self {
            view: ViewModel::new(),
            messages: MessageLog::new(config.capacity),
            config,
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewModel {
        &mut self.view
    }

    fn push(&mut self, text: impl Into<String>, level: MessageLevel, link: Option<String>) {
        let link = link.filter(|_| self.config.show_explorer_links);
        self.messages
            .push(MessageEntry::new(text, level).with_link(link));
    }

    fn describe(&mut self, event: &Event) {
        match event {
            Event::Session(SessionEvent::HardReset { chain_id, .. }) => {
                self.push(
                    format!("Wallet switched to chain {chain_id}; session reloaded"),
                    MessageLevel::Info,
                    None,
                );
            }
            Event::Session(SessionEvent::NetworkSetupFailed { error }) => {
                if let Some(text) = error.user_message() {
                    self.push(text, MessageLevel::Error, None);
                }
            }
            Event::Session(SessionEvent::Changed(_)) => {}

            Event::Workflow(WorkflowEvent::TransactionSent {
                stage,
                hash,
                explorer_url,
            }) => {
                if self.config.show_submissions {
                    self.push(
                        format!("Submitted {stage} transaction {}", format::short_hash(hash)),
                        MessageLevel::Info,
                        explorer_url.clone(),
                    );
                }
            }
            Event::Workflow(WorkflowEvent::TransactionConfirmed { stage, .. }) => {
                let text = match stage {
                    TxStage::Register => "Domain minted!",
                    TxStage::SetRecord => "Record set!",
                };
                let link = self.view.pending.as_ref().and_then(|p| p.explorer_url.clone());
                self.push(text, MessageLevel::Success, link);
            }
            Event::Workflow(WorkflowEvent::Completed(outcome)) => {
                let text = match outcome.kind {
                    WorkflowKind::Mint => format!("{}.kot is yours", outcome.name),
                    WorkflowKind::UpdateRecord => format!("{}.kot record updated", outcome.name),
                };
                self.push(text, MessageLevel::Success, None);
            }
            Event::Workflow(WorkflowEvent::Failed { error, .. })
            | Event::Workflow(WorkflowEvent::Rejected { error, .. }) => {
                if let Some(text) = error.user_message() {
                    self.push(text, MessageLevel::Error, None);
                }
            }
            Event::Workflow(WorkflowEvent::StatusChanged { .. }) => {}

            Event::Listing(ListingEvent::RefreshFailed { error }) => {
                self.push(
                    format!("Could not load names: {error}"),
                    MessageLevel::Warning,
                    None,
                );
            }
            Event::Listing(ListingEvent::Refreshed { .. } | ListingEvent::Cleared) => {}
        }
    }
}

impl EventConsumer for SessionConsumer {
    fn on_event(&mut self, event: &Event) -> EventImpact {
        // Describe first: confirmation messages read the pending link.
        self.describe(event);
        if self.view.apply(event) {
            EventImpact::redraw()
        } else {
            EventImpact::none()
        }
    }

    fn message_log(&self) -> &MessageLog {
        &self.messages
    }

    fn message_log_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    fn take_message_log(self) -> MessageLog {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_blockchain_core::TxHash;
    use kot_runtime::{TxStage, ValidationError, WorkflowError};

    #[test]
    fn rejections_stay_silent() {
        let mut consumer = SessionConsumer::new(MessageConfig::default());
        consumer.on_event(&Event::Workflow(WorkflowEvent::Failed {
            kind: WorkflowKind::Mint,
            name: "abc".into(),
            error: WorkflowError::UserRejected,
        }));
        assert!(consumer.message_log().is_empty());

        consumer.on_event(&Event::Workflow(WorkflowEvent::Rejected {
            kind: WorkflowKind::Mint,
            error: ValidationError::TooShort { min: 3, length: 2 }.into(),
        }));
        let entry = consumer.message_log().recent(1).next().unwrap();
        assert_eq!(entry.text, "Domain must be at least 3 characters long");
        assert_eq!(entry.level, MessageLevel::Error);
    }

    #[test]
    fn confirmation_carries_explorer_link() {
        let mut consumer = SessionConsumer::new(MessageConfig::default());
        let url = "https://mumbai.polygonscan.com/tx/0x01".to_string();
        consumer.on_event(&Event::Workflow(WorkflowEvent::TransactionSent {
            stage: TxStage::Register,
            hash: TxHash::ZERO,
            explorer_url: Some(url.clone()),
        }));
        let impact = consumer.on_event(&Event::Workflow(WorkflowEvent::TransactionConfirmed {
            stage: TxStage::Register,
            hash: TxHash::ZERO,
        }));

        assert!(impact.requires_redraw);
        let entry = consumer.message_log().recent(1).next().unwrap();
        assert_eq!(entry.text, "Domain minted!");
        assert_eq!(entry.link.as_deref(), Some(url.as_str()));
        assert!(consumer.view().pending.is_none());
    }

    #[test]
    fn links_can_be_hidden() {
        let config = MessageConfig {
            show_explorer_links: false,
            ..MessageConfig::default()
        };
        let mut consumer = SessionConsumer::new(config);
        consumer.on_event(&Event::Workflow(WorkflowEvent::TransactionSent {
            stage: TxStage::SetRecord,
            hash: TxHash::ZERO,
            explorer_url: Some("https://example/tx/0x0".into()),
        }));
        assert!(consumer.message_log().recent(1).next().unwrap().link.is_none());
    }
}
