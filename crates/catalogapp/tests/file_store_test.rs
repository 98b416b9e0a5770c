use catalogapp::model::{RawRecord, RecordPatch};
use catalogapp::store::fs_backend::FileStore;
use catalogapp::store::{RemoteStore, Selector, StoreError};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FileStore) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("products.json"));
    (dir, store)
}

#[test]
fn test_missing_file_is_an_empty_table() {
    let (_dir, store) = setup();
    assert!(store.select(&Selector::all()).unwrap().is_empty());
    assert!(store.get("p1").unwrap().is_none());
}

#[test]
fn test_insert_update_delete_cycle() {
    let (_dir, store) = setup();
    store.insert(&RawRecord::new("p1", "Hat")).unwrap();

    let updated = store.update("p1", &RecordPatch::rename("Beanie")).unwrap();
    assert_eq!(updated.name_str(), "Beanie");
    assert_eq!(store.get("p1").unwrap().unwrap().name_str(), "Beanie");

    store.delete("p1").unwrap();
    assert!(store.get("p1").unwrap().is_none());
}

#[test]
fn test_duplicate_insert_is_a_conflict() {
    let (_dir, store) = setup();
    store.insert(&RawRecord::new("p1", "Hat")).unwrap();
    let err = store.insert(&RawRecord::new("p1", "Other")).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(ref id) if id == "p1"));
    assert_eq!(store.get("p1").unwrap().unwrap().name_str(), "Hat");
}

#[test]
fn test_missing_rows_are_not_found() {
    let (_dir, store) = setup();
    assert!(matches!(
        store.update("ghost", &RecordPatch::rename("x")),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.delete("ghost"), Err(StoreError::NotFound(_))));
}

#[test]
fn test_insert_without_id_is_rejected() {
    let (_dir, store) = setup();
    let err = store.insert(&RawRecord::default()).unwrap_err();
    assert!(matches!(err, StoreError::Rejected { status: 400, .. }));
}

#[test]
fn test_newest_first_ordering_survives_disk() {
    let (_dir, store) = setup();
    for (id, year) in [("a", 2022), ("b", 2024), ("c", 2023)] {
        let mut record = RawRecord::new(id, id);
        record.created_at = Some(Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap());
        store.insert(&record).unwrap();
    }

    let ids: Vec<_> = store
        .select(&Selector::newest_first())
        .unwrap()
        .into_iter()
        .map(|r| r.id.unwrap())
        .collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[test]
fn test_no_tmp_files_left_behind() {
    let (dir, store) = setup();
    store.insert(&RawRecord::new("p1", "Hat")).unwrap();
    store.upsert(&RawRecord::new("p1", "Cap")).unwrap();

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_corrupt_file_is_a_decode_error() {
    let (_dir, store) = setup();
    fs::write(store.path(), "{ not json").unwrap();
    assert!(matches!(
        store.select(&Selector::all()),
        Err(StoreError::Decode(_))
    ));
}
