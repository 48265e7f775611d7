//! View-model state derived from runtime events.
use kot_blockchain_core::{Address, TxHash};
use kot_runtime::{
    Event, ListingEvent, MintRecord, NetworkState, SessionEvent, SessionSnapshot, TxStage,
    WorkflowEvent, WorkflowStatus,
};

/// A sent transaction that has not been confirmed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransaction {
    pub stage: TxStage,
    pub hash: TxHash,
    pub explorer_url: Option<String>,
}

/// Everything a presentation layer renders, kept current from events.
#[derive(Clone, Debug, Default)]
pub struct ViewModel {
    pub session: Option<SessionSnapshot>,
    pub records: Vec<MintRecord>,
    pub pending: Option<PendingTransaction>,
    /// Last listing failure, cleared by the next successful refresh.
    pub listing_error: Option<String>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(session: SessionSnapshot, records: Vec<MintRecord>) -> Self {
        Self {
            session: Some(session),
            records,
            ..Self::default()
        }
    }

    /// Fold an event into the view; returns whether anything visible changed.
    pub fn apply(&mut self, event: &Event) -> bool {
        match event {
            Event::Session(SessionEvent::Changed(snapshot)) => {
                self.session = Some(snapshot.clone());
                true
            }
            Event::Session(SessionEvent::HardReset { .. }) => {
                self.records.clear();
                self.pending = None;
                self.listing_error = None;
                true
            }
            Event::Session(SessionEvent::NetworkSetupFailed { .. }) => false,
            Event::Workflow(WorkflowEvent::TransactionSent {
                stage,
                hash,
                explorer_url,
            }) => {
                self.pending = Some(PendingTransaction {
                    stage: *stage,
                    hash: *hash,
                    explorer_url: explorer_url.clone(),
                });
                true
            }
            Event::Workflow(
                WorkflowEvent::TransactionConfirmed { .. }
                | WorkflowEvent::Completed(_)
                | WorkflowEvent::Failed { .. },
            ) => {
                self.pending = None;
                true
            }
            Event::Workflow(WorkflowEvent::StatusChanged { status, .. }) => {
                if let Some(session) = self.session.as_mut() {
                    session.workflow_status = *status;
                }
                true
            }
            Event::Workflow(WorkflowEvent::Rejected { .. }) => false,
            Event::Listing(ListingEvent::Refreshed { records }) => {
                self.records = records.clone();
                self.listing_error = None;
                true
            }
            Event::Listing(ListingEvent::RefreshFailed { error }) => {
                self.listing_error = Some(error.to_string());
                true
            }
            Event::Listing(ListingEvent::Cleared) => {
                self.records.clear();
                true
            }
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.session.as_ref().and_then(|s| s.account)
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    pub fn provider_available(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.provider_available)
    }

    pub fn network_state(&self) -> NetworkState {
        self.session
            .as_ref()
            .map_or(NetworkState::Unknown, |s| s.network_state)
    }

    pub fn is_ready(&self) -> bool {
        self.network_state() == NetworkState::Ready
    }

    pub fn status(&self) -> WorkflowStatus {
        self.session
            .as_ref()
            .map_or(WorkflowStatus::Idle, |s| s.workflow_status)
    }

    pub fn is_busy(&self) -> bool {
        self.status().is_in_flight()
    }

    /// Whether the edit action is offered for `record`.
    pub fn can_edit(&self, record: &MintRecord) -> bool {
        record.is_editable_by(self.account())
    }

    /// The listing is only shown to a connected account on the target chain.
    pub fn listing_visible(&self) -> bool {
        self.is_connected() && self.is_ready()
    }

    /// Names the connected account owns that still lack a record.
    pub fn unrecorded_names(&self) -> Vec<&str> {
        let Some(account) = self.account() else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|r| r.owner == account && !r.has_record())
            .map(|r| r.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kot_blockchain_core::{ChainId, NetworkName};

    fn snapshot(account: Option<Address>) -> SessionSnapshot {
        SessionSnapshot {
            provider_available: true,
            account,
            chain_id: Some(ChainId::POLYGON_MUMBAI),
            network: Some(NetworkName::PolygonMumbai),
            network_state: NetworkState::Ready,
            target_network: NetworkName::PolygonMumbai,
            workflow_status: WorkflowStatus::Idle,
            epoch: 0,
        }
    }

    fn record(id: usize, name: &str, record: &str, owner: Address) -> MintRecord {
        MintRecord {
            id,
            name: name.into(),
            record: record.into(),
            owner,
        }
    }

    #[test]
    fn edit_is_offered_to_owner_only() {
        let alice = Address::repeat_byte(1);
        let bob = Address::repeat_byte(2);
        let mine = record(0, "mine", "x", alice);

        let as_alice = ViewModel::from_snapshot(snapshot(Some(alice)), vec![mine.clone()]);
        let as_bob = ViewModel::from_snapshot(snapshot(Some(bob)), vec![mine.clone()]);
        let anonymous = ViewModel::from_snapshot(snapshot(None), vec![mine.clone()]);

        assert!(as_alice.can_edit(&mine));
        assert!(!as_bob.can_edit(&mine));
        assert!(!anonymous.can_edit(&mine));
        assert!(!anonymous.listing_visible());
    }

    #[test]
    fn refresh_replaces_records_and_reset_clears_them() {
        let alice = Address::repeat_byte(1);
        let mut view = ViewModel::from_snapshot(snapshot(Some(alice)), Vec::new());

        assert!(view.apply(&Event::Listing(ListingEvent::Refreshed {
            records: vec![record(0, "a", "", alice), record(1, "b", "set", alice)],
        })));
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.unrecorded_names(), vec!["a"]);

        view.apply(&Event::Session(SessionEvent::HardReset {
            epoch: 1,
            chain_id: ChainId(1),
        }));
        assert!(view.records.is_empty());
    }

    #[test]
    fn status_follows_workflow_events() {
        let mut view = ViewModel::from_snapshot(snapshot(Some(Address::ZERO)), Vec::new());
        view.apply(&Event::Workflow(WorkflowEvent::StatusChanged {
            kind: kot_runtime::WorkflowKind::Mint,
            name: "abc".into(),
            status: WorkflowStatus::Submitting,
        }));
        assert!(view.is_busy());
    }
}
