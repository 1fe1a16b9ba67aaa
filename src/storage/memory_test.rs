use super::*;

#[test]
fn get_missing_key_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(StoragePort::get(&storage, "nope").unwrap(), None);
}

#[test]
fn set_get_remove() {
    let storage = MemoryStorage::new();
    StoragePort::set(&storage, "k", "{\"a\":1}").unwrap();
    assert_eq!(StoragePort::get(&storage, "k").unwrap().as_deref(), Some("{\"a\":1}"));
    assert_eq!(storage.len(), 1);

    StoragePort::remove(&storage, "k").unwrap();
    assert_eq!(StoragePort::get(&storage, "k").unwrap(), None);
    assert!(storage.is_empty());
}

#[test]
fn remove_missing_key_is_noop() {
    let storage = MemoryStorage::new();
    StoragePort::remove(&storage, "never-set").unwrap();
    StoragePort::remove(&storage, "never-set").unwrap();
}

#[test]
fn clones_share_entries_but_new_stores_do_not() {
    let storage = MemoryStorage::new();
    let clone = storage.clone();
    StoragePort::set(&clone, "k", "v").unwrap();
    assert_eq!(StoragePort::get(&storage, "k").unwrap().as_deref(), Some("v"));
    assert_eq!(StoragePort::get(&MemoryStorage::new(), "k").unwrap(), None);
}

#[test]
fn session_is_process_wide() {
    let key = "memory_test::session_is_process_wide";
    StoragePort::set(&MemoryStorage::session(), key, "1").unwrap();
    assert_eq!(StoragePort::get(&MemoryStorage::session(), key).unwrap().as_deref(), Some("1"));
    StoragePort::remove(&MemoryStorage::session(), key).unwrap();
}

#[tokio::test]
async fn async_port_sees_sync_writes() {
    let storage = MemoryStorage::new();
    StoragePort::set(&storage, "k", "v").unwrap();
    assert_eq!(AsyncStoragePort::get(&storage, "k").await.unwrap().as_deref(), Some("v"));
    AsyncStoragePort::remove(&storage, "k").await.unwrap();
    assert_eq!(StoragePort::get(&storage, "k").unwrap(), None);
}
