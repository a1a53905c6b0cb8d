//! CLI presentation: text and json formatters per command.

use crate::error::ApiError;
use crate::snapshot::{ChangeKind, ChangeReport, Snapshot};
use crate::store::SnapshotId;
use crate::tree::{MerkleTree, NodeIndex, TreeNode};
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Bytes of each digest shown in change reports
const REPORT_HASH_BYTES: usize = 16;
/// Bytes of each digest shown in tree dumps
const TREE_HASH_BYTES: usize = 8;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn report_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(REPORT_TIME_FORMAT).to_string()
}

/// Print the tree structure: `[NODE]` for internal nodes, `[FILE]` for
/// leaves, two spaces of indent per depth. A self-paired child is printed
/// under both slots.
pub fn format_tree(tree: &MerkleTree) -> String {
    let mut out = String::new();
    write_tree_node(tree, tree.root_index(), 0, &mut out);
    out
}

fn write_tree_node(tree: &MerkleTree, index: NodeIndex, depth: usize, out: &mut String) {
    let Some(node) = tree.node(index) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match node {
        TreeNode::Leaf { digest, path } => {
            out.push_str(&format!(
                "{}[FILE] {}: {}\n",
                indent,
                path,
                digest.short_hex(TREE_HASH_BYTES)
            ));
        }
        TreeNode::Internal {
            digest,
            left,
            right,
        } => {
            out.push_str(&format!(
                "{}[NODE] Hash: {}\n",
                indent,
                digest.short_hex(TREE_HASH_BYTES)
            ));
            write_tree_node(tree, *left, depth + 1, out);
            write_tree_node(tree, *right, depth + 1, out);
        }
    }
}

/// Scan result as text: root digest, optional tree dump, where it was saved
pub fn format_scan_text(
    snapshot: &Snapshot,
    tree: Option<&MerkleTree>,
    saved: Option<&SnapshotId>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Merkle Tree Root Hash: {}\n", snapshot.root));
    out.push_str(&format!("Files: {}\n", snapshot.len()));
    if let Some(tree) = tree {
        out.push_str(&format!("\n{}\n", format_section_heading("Tree Structure")));
        out.push_str(&format_tree(tree));
    }
    if let Some(id) = saved {
        out.push_str(&format!("\nTree state saved to {}\n", id));
    }
    out
}

pub fn format_scan_json(snapshot: &Snapshot, saved: Option<&SnapshotId>) -> Result<String, ApiError> {
    let value = json!({
        "timestamp": snapshot.timestamp,
        "root": snapshot.root,
        "file_count": snapshot.len(),
        "saved": saved,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Change report in the classic layout: header, root comparison, one
/// section per change kind, summary line
pub fn format_report_text(report: &ChangeReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        format_section_heading("=== Change Detection Report ===")
    ));
    out.push_str(&format!(
        "Comparing states from {} to {}\n",
        report_time(&report.old_timestamp),
        report_time(&report.new_timestamp)
    ));

    // Leaves hash content only, so a rename can keep the root
    if !report.root_changed() && report.is_empty() {
        out.push_str("\nNo changes detected - root hash is identical\n");
        return out;
    }

    if report.root_changed() {
        out.push_str("\nRoot hash changed - files have been modified\n");
    } else {
        out.push_str("\nRoot hash is identical but file paths changed\n");
    }
    out.push_str(&format!(
        "Old root: {}\n",
        report.old_root.short_hex(REPORT_HASH_BYTES)
    ));
    out.push_str(&format!(
        "New root: {}\n",
        report.new_root.short_hex(REPORT_HASH_BYTES)
    ));

    for (kind, title) in [
        (ChangeKind::Modified, "Modified files:"),
        (ChangeKind::Added, "Added files:"),
        (ChangeKind::Deleted, "Deleted files:"),
    ] {
        out.push_str(&format!("\n{}\n", title));
        let mut any = false;
        for change in report.of_kind(kind) {
            any = true;
            let old = change.old_digest.map(|d| d.short_hex(REPORT_HASH_BYTES));
            let new = change.new_digest.map(|d| d.short_hex(REPORT_HASH_BYTES));
            match kind {
                ChangeKind::Modified => {
                    out.push_str(&format!("  [{}] {}\n", kind, change.path));
                    out.push_str(&format!("    Old hash: {}\n", old.unwrap_or_default()));
                    out.push_str(&format!("    New hash: {}\n", new.unwrap_or_default()));
                }
                ChangeKind::Added => out.push_str(&format!(
                    "  [{}] {} (hash: {})\n",
                    kind,
                    change.path,
                    new.unwrap_or_default()
                )),
                ChangeKind::Deleted => out.push_str(&format!(
                    "  [{}] {} (hash: {})\n",
                    kind,
                    change.path,
                    old.unwrap_or_default()
                )),
            }
        }
        if !any {
            out.push_str("  None\n");
        }
    }

    let summary = report.summary();
    out.push_str(&format!(
        "\nSummary: {} modified, {} added, {} deleted\n",
        summary.modified, summary.added, summary.deleted
    ));
    out
}

fn report_value(report: &ChangeReport) -> serde_json::Value {
    json!({
        "old_timestamp": report.old_timestamp,
        "new_timestamp": report.new_timestamp,
        "old_root": report.old_root,
        "new_root": report.new_root,
        "root_changed": report.root_changed(),
        "changes": report.changes,
        "summary": report.summary(),
    })
}

pub fn format_report_json(report: &ChangeReport) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&report_value(report))?)
}

/// Compare result as JSON; `previous` and `report` are null on a first run
pub fn format_compare_json(
    previous: Option<&SnapshotId>,
    report: Option<&ChangeReport>,
    saved: Option<&SnapshotId>,
) -> Result<String, ApiError> {
    let value = json!({
        "previous": previous,
        "report": report.map(report_value),
        "saved": saved,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Stored snapshot identifiers for one subject
pub fn format_snapshot_list_text(subject: &str, ids: &[SnapshotId]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Snapshots for {}", subject))
    ));
    if ids.is_empty() {
        out.push_str("No snapshots stored.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Snapshot"]);
    for (i, id) in ids.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), id.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_snapshot_list_json(subject: &str, ids: &[SnapshotId]) -> Result<String, ApiError> {
    let value = json!({
        "subject": subject,
        "snapshots": ids,
        "total": ids.len(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// One stored snapshot: header lines and a path/hash table
pub fn format_snapshot_text(id: &SnapshotId, snapshot: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Snapshot")));
    out.push_str(&format!("  Id: {}\n", id));
    out.push_str(&format!("  Taken: {}\n", report_time(&snapshot.timestamp)));
    out.push_str(&format!("  Root hash: {}\n", snapshot.root));
    out.push_str(&format!("  Files: {}\n\n", snapshot.len()));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Hash"]);
    for (path, digest) in &snapshot.files {
        table.add_row(vec![path.clone(), digest.short_hex(REPORT_HASH_BYTES)]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_snapshot_json(id: &SnapshotId, snapshot: &Snapshot) -> Result<String, ApiError> {
    let value = json!({
        "id": id,
        "snapshot": snapshot,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
