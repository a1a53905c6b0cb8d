//! Integration tests for the shape of built trees

use std::fs;
use tempfile::TempDir;
use treesnap::error::TreeError;
use treesnap::tree::hasher::{combine, digest_bytes};
use treesnap::tree::{TreeBuilder, TreeNode};

#[test]
fn test_two_files_root_is_pair_hash() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "hello").unwrap();
    fs::write(temp_dir.path().join("b.txt"), "world").unwrap();

    let tree = TreeBuilder::new(temp_dir.path().to_path_buf()).build().unwrap();

    let expected = combine(&digest_bytes(b"hello"), &digest_bytes(b"world"));
    assert_eq!(tree.root_digest(), expected);
    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(tree.height(), 1);
}

#[test]
fn test_three_files_self_pair_the_last() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "1").unwrap();
    fs::write(temp_dir.path().join("b.txt"), "2").unwrap();
    fs::write(temp_dir.path().join("c.txt"), "3").unwrap();

    let tree = TreeBuilder::new(temp_dir.path().to_path_buf()).build().unwrap();

    let (a, b, c) = (digest_bytes(b"1"), digest_bytes(b"2"), digest_bytes(b"3"));
    let expected = combine(&combine(&a, &b), &combine(&c, &c));
    assert_eq!(tree.root_digest(), expected);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.node_count(), 6);
}

#[test]
fn test_nested_paths_sorted_bytewise() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("a")).unwrap();
    fs::write(temp_dir.path().join("a/b"), "nested").unwrap();
    fs::write(temp_dir.path().join("a.txt"), "flat").unwrap();

    let tree = TreeBuilder::new(temp_dir.path().to_path_buf()).build().unwrap();
    let paths: Vec<&str> = tree.leaves().filter_map(TreeNode::path).collect();

    // '.' (0x2e) sorts before '/' (0x2f)
    assert_eq!(paths, vec!["a.txt", "a/b"]);
}

#[test]
fn test_empty_directory_is_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("only_dirs")).unwrap();

    let result = TreeBuilder::new(temp_dir.path().to_path_buf()).build();
    assert!(matches!(result, Err(TreeError::EmptyTree)));
}

#[test]
fn test_missing_directory_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = TreeBuilder::new(temp_dir.path().join("missing")).build();
    assert!(matches!(result, Err(TreeError::InvalidRoot(_))));
}

#[test]
fn test_internal_nodes_reference_existing_children() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..7 {
        fs::write(temp_dir.path().join(format!("f{}.txt", i)), i.to_string()).unwrap();
    }

    let tree = TreeBuilder::new(temp_dir.path().to_path_buf()).build().unwrap();
    for index in 0..tree.node_count() {
        let node = tree.node(index).unwrap();
        if let Some((left, right)) = node.children() {
            let expected = combine(
                tree.node(left).unwrap().digest(),
                tree.node(right).unwrap().digest(),
            );
            assert_eq!(node.digest(), &expected);
        }
    }
}

#[cfg(unix)]
#[test]
fn test_composed_and_decomposed_names_are_separate_leaves() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("caf\u{e9}.txt"), "composed").unwrap();
    fs::write(temp_dir.path().join("cafe\u{301}.txt"), "decomposed").unwrap();

    let tree = TreeBuilder::new(temp_dir.path().to_path_buf()).build().unwrap();
    let snapshot = treesnap::snapshot::Snapshot::capture(&tree);

    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(
        snapshot.get("caf\u{e9}.txt"),
        Some(&digest_bytes(b"composed"))
    );
    assert_eq!(
        snapshot.get("cafe\u{301}.txt"),
        Some(&digest_bytes(b"decomposed"))
    );
}

#[cfg(unix)]
#[test]
fn test_backslash_name_does_not_collide_with_nested_path() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a\\b"), "flat").unwrap();
    fs::create_dir(temp_dir.path().join("a")).unwrap();
    fs::write(temp_dir.path().join("a").join("b"), "nested").unwrap();

    let tree = TreeBuilder::new(temp_dir.path().to_path_buf()).build().unwrap();
    let snapshot = treesnap::snapshot::Snapshot::capture(&tree);

    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(snapshot.get("a\\b"), Some(&digest_bytes(b"flat")));
    assert_eq!(snapshot.get("a/b"), Some(&digest_bytes(b"nested")));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_does_not_abort_build() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ok.txt"), "fine").unwrap();
    let bad = temp_dir.path().join(OsStr::from_bytes(b"bad\xff.txt"));
    if fs::write(&bad, "bytes").is_err() {
        return;
    }

    let tree = TreeBuilder::new(temp_dir.path().to_path_buf()).build().unwrap();

    assert_eq!(tree.leaf_count(), 1);
    assert_eq!(tree.root_digest(), digest_bytes(b"fine"));
}

#[cfg(unix)]
#[test]
fn test_folder_of_symlinks_is_hashed_by_target_content() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    let links = temp_dir.path().join("links");
    fs::create_dir(&data).unwrap();
    fs::create_dir(&links).unwrap();
    fs::write(data.join("a.txt"), "hello").unwrap();
    fs::write(data.join("b.txt"), "world").unwrap();
    std::os::unix::fs::symlink(data.join("a.txt"), links.join("a.txt")).unwrap();
    std::os::unix::fs::symlink(data.join("b.txt"), links.join("b.txt")).unwrap();

    let linked = TreeBuilder::new(links).build().unwrap();
    let direct = TreeBuilder::new(data).build().unwrap();

    assert_eq!(linked.root_digest(), direct.root_digest());
}
