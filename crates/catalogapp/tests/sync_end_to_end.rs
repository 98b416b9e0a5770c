use catalogapp::api::CatalogApi;
use catalogapp::artifact::ArtifactTarget;
use catalogapp::commands::list::ListFilter;
use catalogapp::commands::MaintenanceOp;
use catalogapp::error::CatalogError;
use catalogapp::model::{CanonicalRecord, RawRecord};
use catalogapp::normalize::CategoryAliases;
use catalogapp::store::fs_backend::FileStore;
use std::fs;
use tempfile::TempDir;

const PREFIX: &str = "import type { Product } from './types';\n\n// Synced from the product table.\n";
const SUFFIX: &str = "\n\nexport default products;\n";

fn artifact(block: &str) -> String {
    format!("{}{}{}", PREFIX, block, SUFFIX)
}

fn setup(rows: &str) -> (TempDir, CatalogApi<FileStore>) {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("products.json");
    fs::write(&store_path, rows).unwrap();
    let artifact_path = dir.path().join("products.ts");
    fs::write(
        &artifact_path,
        artifact("export const products: Product[] = [\n];"),
    )
    .unwrap();

    let api = CatalogApi::new(
        FileStore::new(store_path),
        ArtifactTarget::new(artifact_path),
        CategoryAliases::default(),
    );
    (dir, api)
}

fn block_records(content: &str) -> Vec<CanonicalRecord> {
    let start = content.find("] = ").unwrap() + 4;
    let end = content.rfind("\n];").unwrap() + 2;
    serde_json::from_str(&content[start..end]).unwrap()
}

#[test]
fn test_single_hat_syncs_into_block() {
    let (_dir, api) = setup(
        r#"[{"id": "p1", "name": " Hat ", "category": "Accessories", "archived": false}]"#,
    );

    api.sync(false).unwrap();

    let content = fs::read_to_string(&api.target().path).unwrap();
    assert!(content.starts_with(PREFIX));
    assert!(content.ends_with(SUFFIX));

    let records = block_records(&content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "p1");
    assert_eq!(records[0].name, "Hat");
    assert_eq!(records[0].category, "accessory");
    assert!(!records[0].archived);
    assert_eq!(records[0].archived_at, None);
    assert!(content.contains("\"archivedAt\": null"));
    assert!(content.contains("\"isFeatured\": false"));
}

#[test]
fn test_resync_is_byte_identical() {
    let (_dir, api) = setup(
        r#"[
            {"id": "p1", "name": "Hat", "price": 19.99, "created_at": "2024-01-02T00:00:00Z",
             "size_inventory": {"M": 3, "S": 1}, "nft_metadata": {"b": 1, "a": 2}},
            {"id": "p2", "name": "Tee", "price": 25, "created_at": "2024-03-01T00:00:00Z"}
        ]"#,
    );

    api.sync(false).unwrap();
    let first = fs::read(&api.target().path).unwrap();
    let result = api.sync(false).unwrap();
    let second = fs::read(&api.target().path).unwrap();

    assert_eq!(first, second);
    assert!(!result.sync.unwrap().written);

    let records = block_records(&String::from_utf8(second).unwrap());
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1"]);
}

#[test]
fn test_maintenance_then_sync() {
    let (_dir, api) = setup(
        r#"[
            {"id": "old-hat", "name": "Hat", "category": "accessories"},
            {"id": "tee", "name": "Tee", "category": "Tops"}
        ]"#,
    );

    let ops = vec![
        MaintenanceOp::Rekey {
            from: "old-hat".into(),
            to: "hat".into(),
        },
        MaintenanceOp::Archive { id: "tee".into() },
        MaintenanceOp::Rename {
            id: "missing".into(),
            name: "Nope".into(),
        },
    ];
    let summary = api.run_batch(&ops).unwrap().batch.unwrap();
    assert_eq!(summary.applied(), 2);
    assert_eq!(summary.failed(), 1);

    api.sync(false).unwrap();
    let records = block_records(&fs::read_to_string(&api.target().path).unwrap());
    assert_eq!(records.len(), 2);
    let hat = records.iter().find(|r| r.id == "hat").unwrap();
    assert_eq!(hat.category, "accessory");
    let tee = records.iter().find(|r| r.id == "tee").unwrap();
    assert!(tee.archived && tee.archived_at.is_some());

    let active = api.list(ListFilter::Active).unwrap();
    assert_eq!(active.listed_records.len(), 1);
}

#[test]
fn test_rekey_conflict_leaves_file_store_untouched() {
    let rows = r#"[{"id": "A", "name": "Hat"}, {"id": "B", "name": "Cap"}]"#;
    let (_dir, api) = setup(rows);
    let before = api.store().select_all();

    let err = api.rekey("A", "B").unwrap_err();
    assert!(matches!(err, CatalogError::Conflict { .. }));
    assert_eq!(api.store().select_all(), before);
}

#[test]
fn test_malformed_artifact_is_not_touched() {
    let (_dir, api) = setup(r#"[{"id": "p1", "name": "Hat"}]"#);
    let broken = "export const items = [];\n";
    fs::write(&api.target().path, broken).unwrap();

    let err = api.sync(false).unwrap_err();
    assert!(matches!(err, CatalogError::ArtifactFormat { .. }));
    assert_eq!(fs::read_to_string(&api.target().path).unwrap(), broken);
}

#[test]
fn test_seed_then_sync_preserves_unknown_columns_in_store() {
    let (_dir, api) = setup("");
    let seeded: Vec<RawRecord> =
        serde_json::from_str(r#"[{"id": "p1", "name": "Hat", "slug": "hat"}]"#).unwrap();
    api.seed(&seeded).unwrap();
    api.rekey("p1", "p2").unwrap();

    let rows = api.store().select_all();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].extra["slug"], "hat");
}

#[test]
fn test_rekey_keeps_null_columns_null() {
    let (dir, api) = setup(
        r#"[{"id": "A", "name": "Hat", "description": null, "price": null,
             "images": null, "size_inventory": null}]"#,
    );

    api.rekey("A", "B").unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("products.json")).unwrap())
            .unwrap();
    assert_eq!(stored[0]["id"], "B");
    for column in ["description", "price", "images", "size_inventory"] {
        assert!(stored[0][column].is_null(), "{} changed: {}", column, stored[0][column]);
    }

    api.sync(false).unwrap();
    let records = block_records(&fs::read_to_string(&api.target().path).unwrap());
    assert_eq!(records[0].description, "");
    assert_eq!(records[0].price, 0.0);
}

trait SelectAll {
    fn select_all(&self) -> Vec<RawRecord>;
}

impl SelectAll for FileStore {
    fn select_all(&self) -> Vec<RawRecord> {
        use catalogapp::store::{RemoteStore, Selector};
        self.select(&Selector::all()).unwrap()
    }
}
