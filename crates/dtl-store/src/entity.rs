use dtl_codec::{CodecError, Record, RecordCodec};
use dtl_types::{Donator, EntityKind, Project, Receiver};
use tracing::warn;

use crate::error::StoreError;
use crate::traits::StateStore;

/// Errors from typed entity access.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// Nothing is stored under the entity's key.
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    /// Bytes are present but do not decode to a valid entity.
    #[error("corrupt state under {key}: {reason}")]
    CorruptState { key: String, reason: String },

    /// The entity could not be encoded for storage.
    #[error("failed to encode {key}: {source}")]
    Encode { key: String, source: CodecError },

    /// The host store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type EntityResult<T> = Result<T, EntityError>;

/// Typed get/put for each entity kind over a host [`StateStore`].
///
/// Keys come from [`EntityKind::storage_key`], so each kind lives in its own
/// namespace. Reads decode and check the stored value; writes encode and
/// overwrite.
pub struct EntityStore<S> {
    store: S,
}

impl<S: StateStore> EntityStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying host store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and decode the entity `name` of type `R`.
    pub fn get<R: Record>(&self, name: &str) -> EntityResult<R> {
        let key = R::KIND.storage_key(name);
        let bytes = self.read_present(R::KIND, name, &key)?;
        let record: R = RecordCodec::decode(&bytes).map_err(|e| corrupt(&key, e.to_string()))?;
        Self::verify(&key, name, record.name(), record.check())?;
        Ok(record)
    }

    /// Read `name` of type `R`, mapping absence to `None`.
    pub fn find<R: Record>(&self, name: &str) -> EntityResult<Option<R>> {
        match self.get(name) {
            Ok(record) => Ok(Some(record)),
            Err(EntityError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Encode and store `record` under its own key, overwriting any
    /// previous value.
    pub fn put<R: Record>(&self, record: &R) -> EntityResult<()> {
        let key = R::KIND.storage_key(record.name());
        let bytes = RecordCodec::encode(record).map_err(|source| EntityError::Encode {
            key: key.clone(),
            source,
        })?;
        self.store.put_state(&key, &bytes)?;
        Ok(())
    }

    /// The stored bytes for `name`, after checking they decode to a valid
    /// entity of `kind`.
    pub fn get_raw(&self, kind: EntityKind, name: &str) -> EntityResult<Vec<u8>> {
        let key = kind.storage_key(name);
        let bytes = self.read_present(kind, name, &key)?;
        let record =
            RecordCodec::decode_as(&bytes, kind).map_err(|e| corrupt(&key, e.to_string()))?;
        Self::verify(&key, name, record.name(), record.check())?;
        Ok(bytes)
    }

    pub fn get_donator(&self, name: &str) -> EntityResult<Donator> {
        self.get(name)
    }

    pub fn put_donator(&self, donator: &Donator) -> EntityResult<()> {
        self.put(donator)
    }

    pub fn get_receiver(&self, name: &str) -> EntityResult<Receiver> {
        self.get(name)
    }

    pub fn put_receiver(&self, receiver: &Receiver) -> EntityResult<()> {
        self.put(receiver)
    }

    pub fn get_project(&self, name: &str) -> EntityResult<Project> {
        self.get(name)
    }

    pub fn put_project(&self, project: &Project) -> EntityResult<()> {
        self.put(project)
    }

    fn read_present(&self, kind: EntityKind, name: &str, key: &str) -> EntityResult<Vec<u8>> {
        self.store
            .get_state(key)?
            .ok_or_else(|| EntityError::NotFound {
                kind,
                name: name.to_string(),
            })
    }

    fn verify(
        key: &str,
        name: &str,
        stored_name: &str,
        check: Result<(), dtl_types::TypeError>,
    ) -> EntityResult<()> {
        if stored_name != name {
            return Err(corrupt(key, format!("record is named {stored_name}")));
        }
        check.map_err(|e| corrupt(key, e.to_string()))
    }
}

fn corrupt(key: &str, reason: String) -> EntityError {
    warn!(key, %reason, "corrupt entity state");
    EntityError::CorruptState {
        key: key.to_string(),
        reason,
    }
}

impl<S: StateStore + std::fmt::Debug> std::fmt::Debug for EntityStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStateStore;
    use dtl_types::Timestamp;

    fn store() -> EntityStore<InMemoryStateStore> {
        EntityStore::new(InMemoryStateStore::new())
    }

    fn ts(seconds: i64) -> Timestamp {
        Timestamp::new(seconds, 0)
    }

    #[test]
    fn donator_put_then_get() {
        let entities = store();
        let mut d = Donator::new("alice", ts(1));
        d.donate("roofProject", 50, ts(2)).unwrap();
        entities.put_donator(&d).unwrap();

        assert_eq!(entities.get_donator("alice").unwrap(), d);
        assert_eq!(entities.store().keys(), vec!["donator:alice"]);
    }

    #[test]
    fn receiver_and_project_roundtrip() {
        let entities = store();
        let r = Receiver::new("bob", ts(1));
        let p = Project::new("roofProject", ts(2));
        entities.put_receiver(&r).unwrap();
        entities.put_project(&p).unwrap();
        assert_eq!(entities.get_receiver("bob").unwrap(), r);
        assert_eq!(entities.get_project("roofProject").unwrap(), p);
    }

    #[test]
    fn missing_entity_is_not_found() {
        let entities = store();
        let err = entities.get_receiver("ghost").unwrap_err();
        match err {
            EntityError::NotFound { kind, name } => {
                assert_eq!(kind, EntityKind::Receiver);
                assert_eq!(name, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(entities.find::<Receiver>("ghost").unwrap().is_none());
    }

    #[test]
    fn namespaces_do_not_collide() {
        let entities = store();
        entities.put_donator(&Donator::new("sam", ts(1))).unwrap();
        entities.put_receiver(&Receiver::new("sam", ts(2))).unwrap();
        assert_eq!(entities.get_donator("sam").unwrap().registered_at, ts(1));
        assert_eq!(entities.get_receiver("sam").unwrap().registered_at, ts(2));
        assert!(matches!(
            entities.get_project("sam"),
            Err(EntityError::NotFound { kind: EntityKind::Project, .. })
        ));
    }

    #[test]
    fn undecodable_bytes_are_corrupt_state() {
        let entities = store();
        entities
            .store()
            .put_state("donator:alice", b"garbage bytes here")
            .unwrap();
        let err = entities.get_donator("alice").unwrap_err();
        assert!(matches!(err, EntityError::CorruptState { ref key, .. } if key == "donator:alice"));
        assert!(entities.find::<Donator>("alice").is_err());
    }

    #[test]
    fn wrong_kind_under_key_is_corrupt_state() {
        let entities = store();
        let bytes = RecordCodec::encode(&Receiver::new("alice", ts(1))).unwrap();
        entities.store().put_state("donator:alice", &bytes).unwrap();
        assert!(matches!(
            entities.get_donator("alice"),
            Err(EntityError::CorruptState { .. })
        ));
    }

    #[test]
    fn name_mismatch_is_corrupt_state() {
        let entities = store();
        let bytes = RecordCodec::encode(&Donator::new("mallory", ts(1))).unwrap();
        entities.store().put_state("donator:alice", &bytes).unwrap();
        let err = entities.get_donator("alice").unwrap_err();
        assert!(err.to_string().contains("record is named mallory"));
    }

    #[test]
    fn broken_aggregates_are_corrupt_state() {
        let entities = store();
        let mut d = Donator::new("alice", ts(1));
        d.donate("p", 10, ts(2)).unwrap();
        d.total_donated = 999;
        let bytes = RecordCodec::encode(&d).unwrap();
        entities.store().put_state("donator:alice", &bytes).unwrap();
        assert!(matches!(
            entities.get_donator("alice"),
            Err(EntityError::CorruptState { .. })
        ));
        assert!(matches!(
            entities.get_raw(EntityKind::Donator, "alice"),
            Err(EntityError::CorruptState { .. })
        ));
    }

    #[test]
    fn get_raw_returns_stored_bytes() {
        let entities = store();
        let p = Project::new("roofProject", ts(3));
        entities.put_project(&p).unwrap();
        let raw = entities.get_raw(EntityKind::Project, "roofProject").unwrap();
        assert_eq!(raw, RecordCodec::encode(&p).unwrap());
    }

    #[test]
    fn store_failure_propagates() {
        let entities = store();
        entities.store().set_read_only(true);
        let err = entities.put_donator(&Donator::new("alice", ts(1))).unwrap_err();
        assert!(matches!(err, EntityError::Store(StoreError::ReadOnly)));
        entities.store().set_read_only(false);
        assert!(entities.find::<Donator>("alice").unwrap().is_none());
    }

    #[test]
    fn put_overwrites_previous_value() {
        let entities = store();
        let mut d = Donator::new("alice", ts(1));
        d.donate("p", 10, ts(2)).unwrap();
        entities.put_donator(&d).unwrap();
        entities.put_donator(&Donator::new("alice", ts(5))).unwrap();
        let stored = entities.get_donator("alice").unwrap();
        assert_eq!(stored.total_donated, 0);
        assert_eq!(stored.registered_at, ts(5));
    }
}
