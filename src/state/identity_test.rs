use super::*;
use crate::state::storage::{FileStorage, MemoryStorage};
use std::sync::Arc;

fn ann() -> Identity {
    Identity {
        user_id: "u1".into(),
        name: "Ann".into(),
        email: "a@x.com".into(),
        is_admin: false,
        is_deleted: false,
        is_premium: true,
    }
}

fn memory_store() -> (IdentityStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (IdentityStore::load(Box::new(Arc::clone(&storage))), storage)
}

// =============================================================
// Identity
// =============================================================

#[test]
fn empty_identity_is_unauthenticated() {
    let identity = Identity::empty();
    assert!(!identity.is_authenticated());
    assert_eq!(identity, Identity::default());
}

#[test]
fn identity_deserializes_wire_names() {
    let json = r#"{"user_id":"u1","name":"Ann","email":"a@x.com","isAdmin":false,"isDeleted":false,"isPremium":true}"#;
    let identity: Identity = serde_json::from_str(json).unwrap();
    assert_eq!(identity, ann());
}

#[test]
fn identity_rejects_partial_payload() {
    let json = r#"{"user_id":"u1","name":"Ann"}"#;
    assert!(serde_json::from_str::<Identity>(json).is_err());
}

// =============================================================
// IdentityStore
// =============================================================

#[test]
fn store_starts_empty() {
    let (store, _) = memory_store();
    assert_eq!(store.get(), &Identity::empty());
}

#[test]
fn set_replaces_whole_record() {
    let (mut store, _) = memory_store();
    store.set(Identity { user_id: "old".into(), name: "Old".into(), is_admin: true, ..Identity::empty() });
    store.set(ann());
    assert_eq!(store.get(), &ann());
}

#[test]
fn reset_set_reset_round_trips_to_sentinel() {
    let (mut store, _) = memory_store();
    store.reset();
    let initial = store.get().clone();
    store.set(ann());
    store.reset();
    assert_eq!(store.get(), &initial);
    assert_eq!(store.get(), &Identity::empty());
}

#[test]
fn set_writes_through_and_reset_removes() {
    let (mut store, storage) = memory_store();
    store.set(ann());
    assert_eq!(storage.load(STORAGE_KEY).unwrap(), Some(ann()));

    store.reset();
    assert!(storage.load(STORAGE_KEY).unwrap().is_none());
}

#[test]
fn load_restores_persisted_record() {
    let storage = Arc::new(MemoryStorage::new());
    storage.save(STORAGE_KEY, &ann()).unwrap();

    let store = IdentityStore::load(Box::new(storage));
    assert_eq!(store.get(), &ann());
}

#[test]
fn load_discards_record_without_user_id() {
    let storage = Arc::new(MemoryStorage::new());
    let stray = Identity { name: "Ghost".into(), ..Identity::empty() };
    storage.save(STORAGE_KEY, &stray).unwrap();

    let store = IdentityStore::load(Box::new(storage));
    assert_eq!(store.get(), &Identity::empty());
}

#[test]
fn load_malformed_file_falls_back_to_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("profile.json"), "garbage").unwrap();

    let store = IdentityStore::load(Box::new(FileStorage::new(dir.path())));
    assert_eq!(store.get(), &Identity::empty());
}

#[test]
fn file_backed_store_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = IdentityStore::load(Box::new(FileStorage::new(dir.path())));
        store.set(ann());
    }
    let store = IdentityStore::load(Box::new(FileStorage::new(dir.path())));
    assert_eq!(store.get(), &ann());
}
