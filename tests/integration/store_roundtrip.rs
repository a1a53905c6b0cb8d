//! Integration tests for snapshot persistence backends

use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;
use treesnap::error::StoreError;
use treesnap::snapshot::Snapshot;
use treesnap::store::{CsvSnapshotStore, SledSnapshotStore, SnapshotId, SnapshotStore};
use treesnap::tree::hasher::digest_bytes;
use treesnap::tree::{LeafEntry, MerkleTree};

fn snapshot_at(files: &[(&str, &str)], seconds: i64, nanos: u32) -> Snapshot {
    let leaves = files
        .iter()
        .map(|(path, content)| LeafEntry::from_content(*path, content.as_bytes()))
        .collect();
    let tree = MerkleTree::from_leaves(leaves).unwrap();
    Snapshot::from_tree(&tree, Utc.timestamp_opt(seconds, nanos).unwrap())
}

fn backends(temp_dir: &TempDir) -> Vec<(&'static str, Box<dyn SnapshotStore>)> {
    vec![
        (
            "csv",
            Box::new(CsvSnapshotStore::new(temp_dir.path().join("csv"))),
        ),
        (
            "sled",
            Box::new(SledSnapshotStore::new(temp_dir.path().join("sled")).unwrap()),
        ),
    ]
}

#[test]
fn test_round_trip_preserves_everything() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = snapshot_at(
        &[
            ("plain.txt", "a"),
            ("with,comma.txt", "b"),
            ("with \"quotes\".txt", "c"),
            ("dir/nested file.txt", "d"),
        ],
        1_700_000_000,
        123_456_789,
    );

    for (name, store) in backends(&temp_dir) {
        let id = store.save(&snapshot, "docs").unwrap();
        let loaded = store.load(&id).unwrap();
        assert_eq!(loaded, snapshot, "backend {}", name);
        assert_eq!(loaded.timestamp, snapshot.timestamp, "backend {}", name);
    }
}

#[test]
fn test_latest_picks_newest() {
    let temp_dir = TempDir::new().unwrap();
    let older = snapshot_at(&[("a.txt", "1")], 1_600_000_000, 0);
    let newer = snapshot_at(&[("a.txt", "2")], 1_700_000_000, 0);

    for (name, store) in backends(&temp_dir) {
        store.save(&newer, "docs").unwrap();
        store.save(&older, "docs").unwrap();

        let ids = store.list("docs").unwrap();
        assert_eq!(ids.len(), 2, "backend {}", name);
        assert_eq!(store.load(&ids[0]).unwrap(), older, "backend {}", name);
        assert_eq!(store.load_most_recent("docs").unwrap(), newer, "backend {}", name);
    }
}

#[test]
fn test_no_prior_state_is_distinct_error() {
    let temp_dir = TempDir::new().unwrap();

    for (name, store) in backends(&temp_dir) {
        let err = store.latest("docs").unwrap_err();
        assert!(
            matches!(err, StoreError::NoPriorState { ref subject } if subject == "docs"),
            "backend {}",
            name
        );
    }
}

#[test]
fn test_missing_snapshot_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let csv = CsvSnapshotStore::new(temp_dir.path().to_path_buf());
    let missing = temp_dir.path().join("state_docs_20240101_000000.csv");

    let err = csv
        .load(&SnapshotId::new(missing.to_string_lossy()))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_subjects_sharing_a_prefix_stay_separate() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = snapshot_at(&[("a.txt", "1")], 1_700_000_000, 0);

    for (name, store) in backends(&temp_dir) {
        store.save(&snapshot, "a").unwrap();
        store.save(&snapshot, "a_b").unwrap();

        assert_eq!(store.list("a").unwrap().len(), 1, "backend {}", name);
        assert_eq!(store.list("a_b").unwrap().len(), 1, "backend {}", name);
        assert!(store.list("b").unwrap().is_empty(), "backend {}", name);
    }
}

#[test]
fn test_csv_file_layout() {
    let temp_dir = TempDir::new().unwrap();
    let store = CsvSnapshotStore::new(temp_dir.path().to_path_buf());
    let snapshot = snapshot_at(&[("a.txt", "hello"), ("b,c.txt", "world")], 1_700_000_000, 0);

    let id = store.save(&snapshot, "docs").unwrap();
    assert!(id.as_str().ends_with("state_docs_20231114_221320.csv"));

    let text = fs::read_to_string(id.as_str()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "timestamp,root_hash,file_path,file_hash");
    assert_eq!(lines.len(), 3);

    let root = snapshot.root.to_hex();
    assert_eq!(
        lines[1],
        format!("2023-11-14T22:13:20Z,{},a.txt,{}", root, digest_bytes(b"hello"))
    );
    assert_eq!(
        lines[2],
        format!("2023-11-14T22:13:20Z,{},\"b,c.txt\",{}", root, digest_bytes(b"world"))
    );
}

#[test]
fn test_csv_malformed_tables() {
    let temp_dir = TempDir::new().unwrap();
    let store = CsvSnapshotStore::new(temp_dir.path().to_path_buf());
    let root = digest_bytes(b"root").to_hex();
    let other_root = digest_bytes(b"other").to_hex();
    let leaf = digest_bytes(b"leaf").to_hex();

    let cases = [
        ("bad_header", "time,root,path,hash\n".to_string()),
        (
            "short_row",
            format!(
                "timestamp,root_hash,file_path,file_hash\n2024-01-01T00:00:00Z,{},a.txt\n",
                root
            ),
        ),
        (
            "bad_hex",
            format!(
                "timestamp,root_hash,file_path,file_hash\n2024-01-01T00:00:00Z,{},a.txt,zz\n",
                root
            ),
        ),
        (
            "mixed_root",
            format!(
                "timestamp,root_hash,file_path,file_hash\n\
                 2024-01-01T00:00:00Z,{},a.txt,{}\n\
                 2024-01-01T00:00:00Z,{},b.txt,{}\n",
                root, leaf, other_root, leaf
            ),
        ),
    ];

    for (name, body) in cases {
        let path = temp_dir.path().join(format!("{}.csv", name));
        fs::write(&path, body).unwrap();
        let err = store
            .load(&SnapshotId::new(path.to_string_lossy()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }), "case {}", name);
    }
}

#[test]
fn test_sled_store_from_open_database() {
    let db = sled::Config::new().temporary(true).open().unwrap();
    let store = SledSnapshotStore::from_db(db);
    let snapshot = snapshot_at(&[("a.txt", "1"), ("b.txt", "2")], 1_700_000_000, 42);

    let id = store.save(&snapshot, "docs").unwrap();
    assert_eq!(id.as_str(), "snapshot:docs:01700000000000000042");
    assert_eq!(store.load(&id).unwrap(), snapshot);
    assert_eq!(store.latest("docs").unwrap(), id);
}

#[test]
fn test_flattened_map_is_not_rebuilt_into_a_root() {
    // Stored root is the captured one, not recomputed from the map
    let temp_dir = TempDir::new().unwrap();
    let store = CsvSnapshotStore::new(temp_dir.path().to_path_buf());
    let mut files = BTreeMap::new();
    files.insert("a.txt".to_string(), digest_bytes(b"1"));
    let snapshot = Snapshot {
        timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        root: digest_bytes(b"arbitrary root"),
        files,
    };

    let id = store.save(&snapshot, "docs").unwrap();
    assert_eq!(store.load(&id).unwrap().root, digest_bytes(b"arbitrary root"));
}
