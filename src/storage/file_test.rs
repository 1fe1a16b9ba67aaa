use super::*;

fn store() -> (tempfile::TempDir, FileStorage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path().join("drafts")).expect("storage");
    (dir, storage)
}

#[test]
fn new_creates_base_directory() {
    let (_dir, storage) = store();
    assert!(storage.base().is_dir());
}

#[test]
fn missing_key_reads_as_none_and_removes_cleanly() {
    let (_dir, storage) = store();
    assert_eq!(storage.get("signup").unwrap(), None);
    storage.remove("signup").unwrap();
}

#[test]
fn set_then_get_round_trips_text() {
    let (_dir, storage) = store();
    storage.set("signup", r#"{"email":"a@b.c"}"#).unwrap();
    assert_eq!(storage.get("signup").unwrap().as_deref(), Some(r#"{"email":"a@b.c"}"#));

    storage.set("signup", "{}").unwrap();
    assert_eq!(storage.get("signup").unwrap().as_deref(), Some("{}"));
}

#[test]
fn remove_deletes_file() {
    let (_dir, storage) = store();
    storage.set("k", "v").unwrap();
    storage.remove("k").unwrap();
    assert_eq!(storage.get("k").unwrap(), None);
    assert_eq!(std::fs::read_dir(storage.base()).unwrap().count(), 0);
}

#[test]
fn keys_with_path_characters_stay_inside_base() {
    let (_dir, storage) = store();
    storage.set("../escape/..", "x").unwrap();
    let entries: Vec<_> = std::fs::read_dir(storage.base())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, vec!["%2E%2E%2Fescape%2F%2E%2E.json".to_owned()]);
    assert_eq!(storage.get("../escape/..").unwrap().as_deref(), Some("x"));
}

#[test]
fn distinct_keys_map_to_distinct_files() {
    assert_ne!(encode_key("a/b"), encode_key("a_b"));
    assert_eq!(encode_key("form-1_draft"), "form-1_draft");
    assert_eq!(encode_key("é"), "%C3%A9");
}

#[test]
fn unusable_base_reports_init_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = FileStorage::new(blocker.join("drafts")).unwrap_err();
    assert_eq!(err.op(), StorageOp::Open);
    assert!(matches!(err, StorageError::Init { ref path, .. } if path.ends_with("drafts")));
}

#[tokio::test]
async fn async_port_reads_sync_writes() {
    use crate::storage::AsyncStoragePort;

    let (_dir, storage) = store();
    StoragePort::set(&storage, "signup", "{}").unwrap();
    assert_eq!(AsyncStoragePort::get(&storage, "signup").await.unwrap().as_deref(), Some("{}"));
    AsyncStoragePort::remove(&storage, "signup").await.unwrap();
    assert_eq!(StoragePort::get(&storage, "signup").unwrap(), None);
}
