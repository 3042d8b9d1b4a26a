use dtl_store::{EntityStore, StateStore};
use dtl_types::{validate_name, Donator, DonatorRecord, EntityKind, Project, Receiver};
use tracing::debug;

use crate::amount::parse_amount;
use crate::clock::TxClock;
use crate::error::{LedgerError, LedgerResult};

/// Donation ledger over a host key-value store.
///
/// Every mutation reads at most one entity, updates it in memory, and writes
/// it back under the key derived from the validated name argument. There is
/// no cross-key write, so a failure at any step leaves the store unchanged.
pub struct Ledger<S, C> {
    entities: EntityStore<S>,
    clock: C,
}

impl<S: StateStore, C: TxClock> Ledger<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            entities: EntityStore::new(store),
            clock,
        }
    }

    /// Typed access to the underlying entity store.
    pub fn entities(&self) -> &EntityStore<S> {
        &self.entities
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ---- Registration ----

    /// Create (or reset) a donator with no history.
    pub fn register_donator(&self, name: &str) -> LedgerResult<Donator> {
        let name = checked_name(EntityKind::Donator, name)?;
        let donator = Donator::new(name, self.clock.tx_timestamp());
        self.entities.put_donator(&donator)?;
        debug!(donator = name, "donator registered");
        Ok(donator)
    }

    /// Create (or reset) a receiver with zero balance.
    pub fn register_receiver(&self, name: &str) -> LedgerResult<Receiver> {
        let name = checked_name(EntityKind::Receiver, name)?;
        let receiver = Receiver::new(name, self.clock.tx_timestamp());
        self.entities.put_receiver(&receiver)?;
        debug!(receiver = name, "receiver registered");
        Ok(receiver)
    }

    /// Create (or reset) a project so it can be tracked.
    pub fn register_project(&self, name: &str) -> LedgerResult<Project> {
        let name = checked_name(EntityKind::Project, name)?;
        let project = Project::new(name, self.clock.tx_timestamp());
        self.entities.put_project(&project)?;
        debug!(project = name, "project registered");
        Ok(project)
    }

    // ---- Transfers ----

    /// Record a donation from `donator` to `project`.
    ///
    /// An unknown donator starts from an empty history registered at this
    /// transaction's timestamp. Returns the appended record.
    pub fn donate(
        &self,
        donator: &str,
        project: &str,
        amount_text: &str,
    ) -> LedgerResult<DonatorRecord> {
        let donator = checked_name(EntityKind::Donator, donator)?;
        let project = checked_name(EntityKind::Project, project)?;
        let amount = parse_amount(amount_text)?;
        let now = self.clock.tx_timestamp();

        let mut entity = self
            .entities
            .find::<Donator>(donator)?
            .unwrap_or_else(|| Donator::new(donator, now));
        let record = entity
            .donate(project, amount, now)
            .map_err(|e| LedgerError::invalid_amount(amount_text, e))?
            .clone();

        self.entities.put_donator(&entity)?;
        debug!(
            donator,
            project,
            amount,
            seq = record.sequence_index,
            total = entity.total_donated,
            "donation recorded"
        );
        Ok(record)
    }

    /// Credit `receiver` with `amount` assigned from `project`.
    ///
    /// An unknown receiver starts at zero balance. The updated value is
    /// always stored under the receiver's own key. Returns the new state.
    pub fn assign(
        &self,
        project: &str,
        receiver: &str,
        amount_text: &str,
    ) -> LedgerResult<Receiver> {
        let project = checked_name(EntityKind::Project, project)?;
        let receiver = checked_name(EntityKind::Receiver, receiver)?;
        let amount = parse_amount(amount_text)?;

        let mut entity = match self.entities.find::<Receiver>(receiver)? {
            Some(existing) => existing,
            None => Receiver::new(receiver, self.clock.tx_timestamp()),
        };
        entity
            .credit(project, amount)
            .map_err(|e| LedgerError::invalid_amount(amount_text, e))?;

        self.entities.put_receiver(&entity)?;
        debug!(
            project,
            receiver,
            amount,
            balance = entity.balance,
            "funds assigned"
        );
        Ok(entity)
    }

    // ---- Queries ----

    /// Encoded state of a project.
    pub fn track_project(&self, name: &str) -> LedgerResult<Vec<u8>> {
        self.track(EntityKind::Project, name)
    }

    /// Encoded state of a receiver.
    pub fn track_receiver(&self, name: &str) -> LedgerResult<Vec<u8>> {
        self.track(EntityKind::Receiver, name)
    }

    /// Encoded state of a donator.
    pub fn track_donator(&self, name: &str) -> LedgerResult<Vec<u8>> {
        self.track(EntityKind::Donator, name)
    }

    pub fn donator(&self, name: &str) -> LedgerResult<Donator> {
        let name = checked_name(EntityKind::Donator, name)?;
        Ok(self.entities.get_donator(name)?)
    }

    pub fn receiver(&self, name: &str) -> LedgerResult<Receiver> {
        let name = checked_name(EntityKind::Receiver, name)?;
        Ok(self.entities.get_receiver(name)?)
    }

    pub fn project(&self, name: &str) -> LedgerResult<Project> {
        let name = checked_name(EntityKind::Project, name)?;
        Ok(self.entities.get_project(name)?)
    }

    fn track(&self, kind: EntityKind, name: &str) -> LedgerResult<Vec<u8>> {
        let name = checked_name(kind, name)?;
        Ok(self.entities.get_raw(kind, name)?)
    }
}

fn checked_name(kind: EntityKind, name: &str) -> LedgerResult<&str> {
    validate_name(kind, name).map_err(|e| LedgerError::invalid_name(kind, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use dtl_codec::RecordCodec;
    use dtl_store::InMemoryStateStore;
    use dtl_types::Timestamp;
    use proptest::prelude::*;

    type TestLedger = Ledger<InMemoryStateStore, ManualClock>;

    fn ledger() -> TestLedger {
        Ledger::new(
            InMemoryStateStore::new(),
            ManualClock::new(Timestamp::new(1_000, 0)),
        )
    }

    fn snapshot(ledger: &TestLedger) -> Vec<(String, Option<Vec<u8>>)> {
        let store = ledger.entities().store();
        store
            .keys()
            .into_iter()
            .map(|k| {
                let v = store.get_state(&k).unwrap();
                (k, v)
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    #[test]
    fn registered_donator_is_retrievable_with_zero_totals() {
        let ledger = ledger();
        ledger.register_donator("alice").unwrap();

        let d = ledger.donator("alice").unwrap();
        assert_eq!(d.name, "alice");
        assert_eq!(d.total_donated, 0);
        assert_eq!(d.donation_count, 0);
        assert!(d.records.is_empty());
        assert_eq!(d.registered_at, Timestamp::new(1_000, 0));
    }

    #[test]
    fn registered_receiver_is_retrievable_with_zero_balance() {
        let ledger = ledger();
        ledger.register_receiver("bob").unwrap();

        let r = ledger.receiver("bob").unwrap();
        assert_eq!(r.name, "bob");
        assert_eq!(r.balance, 0);
        assert_eq!(r.last_project, None);
    }

    #[test]
    fn registered_project_is_trackable() {
        let ledger = ledger();
        let p = ledger.register_project("roofProject").unwrap();
        let bytes = ledger.track_project("roofProject").unwrap();
        assert_eq!(RecordCodec::decode::<Project>(&bytes).unwrap(), p);
    }

    #[test]
    fn reregistration_overwrites() {
        let ledger = ledger();
        ledger.register_donator("alice").unwrap();
        ledger.donate("alice", "roofProject", "50").unwrap();
        ledger.register_donator("alice").unwrap();

        let d = ledger.donator("alice").unwrap();
        assert_eq!(d.total_donated, 0);
        assert!(d.records.is_empty());
    }

    #[test]
    fn registration_keys_by_argument_name() {
        let ledger = ledger();
        ledger.register_donator("alice").unwrap();
        ledger.register_receiver("bob").unwrap();
        assert_eq!(
            ledger.entities().store().keys(),
            vec!["donator:alice", "receiver:bob"]
        );
    }

    #[test]
    fn empty_name_is_rejected_without_write() {
        let ledger = ledger();
        assert!(matches!(
            ledger.register_donator(""),
            Err(LedgerError::InvalidName { kind: EntityKind::Donator, .. })
        ));
        assert!(matches!(
            ledger.assign("roofProject", "", "5"),
            Err(LedgerError::InvalidName { kind: EntityKind::Receiver, .. })
        ));
        assert!(matches!(
            ledger.donate("alice", "", "5"),
            Err(LedgerError::InvalidName { kind: EntityKind::Project, .. })
        ));
        assert!(ledger.entities().store().is_empty());
    }

    // -----------------------------------------------------------------------
    // Donations
    // -----------------------------------------------------------------------

    #[test]
    fn donations_accumulate_in_order() {
        let ledger = ledger();
        ledger.register_donator("alice").unwrap();
        ledger.donate("alice", "roofProject", "50").unwrap();
        ledger.donate("alice", "roofProject", "30").unwrap();

        let bytes = ledger.track_donator("alice").unwrap();
        let d: Donator = RecordCodec::decode(&bytes).unwrap();
        assert_eq!(d.total_donated, 80);
        assert_eq!(d.donation_count, 2);
        assert_eq!(d.records.len(), 2);
        assert_eq!(d.records[0].amount, 50);
        assert_eq!(d.records[1].amount, 30);
        assert_eq!(d.records[0].sequence_index, 0);
        assert_eq!(d.records[1].sequence_index, 1);
        assert!(d.records[1].timestamp > d.records[0].timestamp);
    }

    #[test]
    fn donate_to_unregistered_donator_creates_it() {
        let ledger = ledger();
        let record = ledger.donate("carol", "wellProject", "12").unwrap();
        assert_eq!(record.sequence_index, 0);
        assert_eq!(record.donator, "carol");
        assert_eq!(record.project, "wellProject");

        let d = ledger.donator("carol").unwrap();
        assert_eq!(d.total_donated, 12);
        assert_eq!(d.registered_at, record.timestamp);
    }

    #[test]
    fn invalid_amount_leaves_donator_unchanged() {
        let ledger = ledger();
        ledger.donate("alice", "roofProject", "50").unwrap();
        let before = snapshot(&ledger);

        for bad in ["abc", "-5", "0", "", "1e3"] {
            let err = ledger.donate("alice", "roofProject", bad).unwrap_err();
            assert!(
                matches!(err, LedgerError::InvalidAmount { .. }),
                "{bad:?} gave {err}"
            );
        }
        assert_eq!(snapshot(&ledger), before);
    }

    #[test]
    fn invalid_amount_does_not_create_donator() {
        let ledger = ledger();
        assert!(ledger.donate("ghost", "p", "-1").is_err());
        assert!(matches!(
            ledger.track_donator("ghost"),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn total_overflow_is_invalid_amount() {
        let ledger = ledger();
        ledger
            .donate("whale", "p", &u64::MAX.to_string())
            .unwrap();
        let before = snapshot(&ledger);
        let err = ledger.donate("whale", "p", "1").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
        assert_eq!(snapshot(&ledger), before);
    }

    // -----------------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------------

    #[test]
    fn assign_to_unregistered_receiver() {
        let ledger = ledger();
        ledger.assign("roofProject", "bob", "20").unwrap();

        let bytes = ledger.track_receiver("bob").unwrap();
        let r: Receiver = RecordCodec::decode(&bytes).unwrap();
        assert_eq!(r.balance, 20);
        assert_eq!(r.last_project.as_deref(), Some("roofProject"));
    }

    #[test]
    fn assign_keeps_registration_time() {
        let ledger = ledger();
        let registered = ledger.register_receiver("bob").unwrap();
        ledger.assign("roofProject", "bob", "5").unwrap();
        ledger.assign("wellProject", "bob", "7").unwrap();

        let r = ledger.receiver("bob").unwrap();
        assert_eq!(r.registered_at, registered.registered_at);
        assert_eq!(r.balance, 12);
        assert_eq!(r.last_project.as_deref(), Some("wellProject"));
    }

    #[test]
    fn assign_stores_under_receiver_key_only() {
        let ledger = ledger();
        ledger.assign("roofProject", "bob", "20").unwrap();
        assert_eq!(ledger.entities().store().keys(), vec!["receiver:bob"]);
        assert!(matches!(
            ledger.track_project("roofProject"),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn zero_assignment_keeps_balance() {
        let ledger = ledger();
        ledger.register_receiver("bob").unwrap();
        ledger.assign("roofProject", "bob", "15").unwrap();

        let r = ledger.assign("wellProject", "bob", "0").unwrap();
        assert_eq!(r.balance, 15);
        assert_eq!(ledger.receiver("bob").unwrap().balance, 15);
        assert_eq!(r.last_project.as_deref(), Some("wellProject"));
    }

    #[test]
    fn zero_donation_is_rejected() {
        let ledger = ledger();
        ledger.register_donator("alice").unwrap();
        let before = snapshot(&ledger);
        match ledger.donate("alice", "roofProject", "0") {
            Err(LedgerError::InvalidAmount { input, reason }) => {
                assert_eq!(input, "0");
                assert_eq!(reason, "amount must be positive");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(snapshot(&ledger), before);
    }

    #[test]
    fn invalid_amount_leaves_receiver_unchanged() {
        let ledger = ledger();
        ledger.assign("roofProject", "bob", "20").unwrap();
        let before = snapshot(&ledger);
        assert!(matches!(
            ledger.assign("roofProject", "bob", "twenty"),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(matches!(
            ledger.assign("roofProject", "bob", "-20"),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert_eq!(snapshot(&ledger), before);
    }

    // -----------------------------------------------------------------------
    // Queries and failures
    // -----------------------------------------------------------------------

    #[test]
    fn queries_on_untouched_names_are_not_found() {
        let ledger = ledger();
        for err in [
            ledger.track_donator("nobody").unwrap_err(),
            ledger.track_receiver("nobody").unwrap_err(),
            ledger.track_project("nothing").unwrap_err(),
        ] {
            assert!(matches!(err, LedgerError::NotFound { .. }));
        }
        let err = ledger.track_receiver("nobody").unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn donator_is_not_visible_as_receiver() {
        let ledger = ledger();
        ledger.register_donator("sam").unwrap();
        assert!(matches!(
            ledger.track_receiver("sam"),
            Err(LedgerError::NotFound { kind: EntityKind::Receiver, .. })
        ));
    }

    #[test]
    fn corrupt_stored_value_is_reported() {
        let ledger = ledger();
        ledger
            .entities()
            .store()
            .put_state("donator:alice", b"\x00\x01\x02")
            .unwrap();
        assert!(matches!(
            ledger.track_donator("alice"),
            Err(LedgerError::CorruptState { .. })
        ));
        // A donation never silently replaces unreadable history.
        assert!(matches!(
            ledger.donate("alice", "p", "5"),
            Err(LedgerError::CorruptState { .. })
        ));
        assert_eq!(
            ledger.entities().store().get_state("donator:alice").unwrap(),
            Some(b"\x00\x01\x02".to_vec())
        );
    }

    #[test]
    fn store_failure_is_propagated() {
        let ledger = ledger();
        ledger.register_receiver("bob").unwrap();
        ledger.entities().store().set_read_only(true);
        let err = ledger.assign("p", "bob", "5").unwrap_err();
        assert!(matches!(err, LedgerError::Store(dtl_store::StoreError::ReadOnly)));
        ledger.entities().store().set_read_only(false);
        assert_eq!(ledger.receiver("bob").unwrap().balance, 0);
    }

    proptest! {
        #[test]
        fn donation_totals_match_sum(amounts in proptest::collection::vec(1u64..100_000, 1..25)) {
            let ledger = ledger();
            for amount in &amounts {
                ledger.donate("alice", "roofProject", &amount.to_string()).unwrap();
            }
            let d = ledger.donator("alice").unwrap();
            prop_assert_eq!(d.total_donated, amounts.iter().sum::<u64>());
            prop_assert_eq!(d.donation_count, amounts.len() as u64);
            for (i, record) in d.records.iter().enumerate() {
                prop_assert_eq!(record.sequence_index, i as u64);
                prop_assert_eq!(record.amount, amounts[i]);
            }
        }

        #[test]
        fn assigned_balance_matches_sum(amounts in proptest::collection::vec(1u64..100_000, 1..25)) {
            let ledger = ledger();
            for (i, amount) in amounts.iter().enumerate() {
                let project = format!("project-{}", i % 3);
                ledger.assign(&project, "bob", &amount.to_string()).unwrap();
            }
            let r = ledger.receiver("bob").unwrap();
            prop_assert_eq!(r.balance, amounts.iter().sum::<u64>());
        }
    }
}
