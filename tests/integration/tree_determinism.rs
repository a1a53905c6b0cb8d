//! Integration tests for tree building determinism

use std::fs;
use tempfile::TempDir;
use treesnap::tree::walker::WalkerConfig;
use treesnap::tree::TreeBuilder;

/// Test that the same filesystem produces the same root hash
#[test]
fn test_same_filesystem_same_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();

    fs::write(root.join("file1.txt"), "content1").unwrap();
    fs::write(root.join("file2.txt"), "content2").unwrap();
    fs::create_dir(root.join("dir1")).unwrap();
    fs::write(root.join("dir1").join("file3.txt"), "content3").unwrap();

    let builder = TreeBuilder::new(root.clone());
    let root1 = builder.compute_root().unwrap();
    let root2 = builder.compute_root().unwrap();

    assert_eq!(root1, root2);
}

/// Identical content under different parent directories hashes the same
#[test]
fn test_location_independent_root() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for dir in [first.path(), second.path()] {
        fs::create_dir_all(dir.join("nested/deeper")).unwrap();
        fs::write(dir.join("a.txt"), "alpha").unwrap();
        fs::write(dir.join("nested/b.txt"), "beta").unwrap();
        fs::write(dir.join("nested/deeper/c.txt"), "gamma").unwrap();
    }

    let root1 = TreeBuilder::new(first.path().to_path_buf()).compute_root().unwrap();
    let root2 = TreeBuilder::new(second.path().to_path_buf()).compute_root().unwrap();
    assert_eq!(root1, root2);
}

/// Creation order on disk does not affect the root
#[test]
fn test_creation_order_does_not_matter() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for name in ["c.txt", "a.txt", "b.txt"] {
        fs::write(first.path().join(name), name).unwrap();
    }
    for name in ["b.txt", "c.txt", "a.txt"] {
        fs::write(second.path().join(name), name).unwrap();
    }

    assert_eq!(
        TreeBuilder::new(first.path().to_path_buf()).compute_root().unwrap(),
        TreeBuilder::new(second.path().to_path_buf()).compute_root().unwrap()
    );
}

/// Test that file content changes produce different root hashes
#[test]
fn test_file_content_change_different_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();

    fs::write(root.join("test.txt"), "content1").unwrap();

    let builder = TreeBuilder::new(root.clone());
    let root1 = builder.compute_root().unwrap();

    fs::write(root.join("test.txt"), "content2").unwrap();
    let root2 = builder.compute_root().unwrap();

    assert_ne!(root1, root2);
}

/// Test that file addition produces different root hash
#[test]
fn test_file_addition_different_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();

    fs::write(root.join("file1.txt"), "content").unwrap();

    let builder = TreeBuilder::new(root.clone());
    let root1 = builder.compute_root().unwrap();

    fs::write(root.join("file2.txt"), "content").unwrap();
    let root2 = builder.compute_root().unwrap();

    assert_ne!(root1, root2);
}

/// Renaming a file changes the set of paths, so the snapshot differs even
/// though the leaf digests are content-only
#[test]
fn test_rename_keeps_root_but_changes_paths() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();
    fs::write(root.join("a.txt"), "same").unwrap();

    let before = TreeBuilder::new(root.clone()).build().unwrap();
    fs::rename(root.join("a.txt"), root.join("b.txt")).unwrap();
    let after = TreeBuilder::new(root.clone()).build().unwrap();

    // Single leaf: the root is the content digest alone
    assert_eq!(before.root_digest(), after.root_digest());
    assert_eq!(before.root().path(), Some("a.txt"));
    assert_eq!(after.root().path(), Some("b.txt"));
}

/// Ignored directories never contribute to the root
#[test]
fn test_ignored_directory_does_not_change_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();
    fs::write(root.join("a.txt"), "alpha").unwrap();

    let config = WalkerConfig {
        ignore: vec![".git".to_string()],
        ..WalkerConfig::default()
    };
    let builder = TreeBuilder::new(root.clone()).with_walker_config(config);
    let root1 = builder.compute_root().unwrap();

    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
    let root2 = builder.compute_root().unwrap();

    assert_eq!(root1, root2);
}
