//! Property-based tests for determinism guarantees

use proptest::prelude::*;
use std::collections::BTreeMap;
use treesnap::snapshot::flatten;
use treesnap::tree::hasher::{combine, digest_bytes};
use treesnap::tree::{LeafEntry, MerkleTree};

fn leaves_from(files: &BTreeMap<String, Vec<u8>>) -> Vec<LeafEntry> {
    files
        .iter()
        .map(|(path, content)| LeafEntry::from_content(path.clone(), content))
        .collect()
}

/// Arbitrary non-empty file sets with distinct paths
fn file_sets() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map("[a-z]{1,6}(/[a-z]{1,6}){0,2}\\.txt", any::<Vec<u8>>(), 1..40)
}

/// Test that content hashing is deterministic
#[test]
fn test_digest_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<Vec<u8>>(), any::<Vec<u8>>()), |(content1, content2)| {
            let hash1 = digest_bytes(&content1);
            let hash2 = digest_bytes(&content2);

            if content1 == content2 {
                prop_assert_eq!(hash1, hash2);
            } else {
                prop_assert_ne!(hash1, hash2);
            }

            Ok(())
        })
        .unwrap();
}

/// Leaf order fed to the builder never changes the root
#[test]
fn test_root_independent_of_input_order() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&file_sets(), |files| {
            let leaves = leaves_from(&files);
            let mut reversed = leaves.clone();
            reversed.reverse();

            let forward = MerkleTree::from_leaves(leaves).unwrap();
            let backward = MerkleTree::from_leaves(reversed).unwrap();
            prop_assert_eq!(forward.root_digest(), backward.root_digest());

            Ok(())
        })
        .unwrap();
}

/// Flattening recovers exactly the input map
#[test]
fn test_flatten_recovers_leaves() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&file_sets(), |files| {
            let tree = MerkleTree::from_leaves(leaves_from(&files)).unwrap();
            let flat = flatten(&tree);

            prop_assert_eq!(flat.len(), files.len());
            for (path, content) in &files {
                prop_assert_eq!(flat.get(path), Some(&digest_bytes(content)));
            }

            Ok(())
        })
        .unwrap();
}

/// The root equals a straightforward level-by-level recomputation
#[test]
fn test_root_matches_reference_reduction() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&file_sets(), |files| {
            let tree = MerkleTree::from_leaves(leaves_from(&files)).unwrap();

            let mut level: Vec<_> = files.values().map(|c| digest_bytes(c)).collect();
            while level.len() > 1 {
                level = level
                    .chunks(2)
                    .map(|pair| combine(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                    .collect();
            }

            prop_assert_eq!(tree.root_digest(), level[0]);
            prop_assert_eq!(tree.leaf_count(), files.len());

            Ok(())
        })
        .unwrap();
}
