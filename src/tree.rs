//! Reconstructs folder template forests from flat store rows.
//!
//! The store's row order (parents first, siblings by sort order then name)
//! is preserved verbatim: sibling order here is purely the order in which
//! rows are consumed, never an in-memory re-sort.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::FolderRow;

/// A node in a folder template tree. `children` is populated only by
/// [`build_forest`]; it is never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub sort_order: i64,
    pub children: Vec<FolderNode>,
}

/// Build the forest for one partition from its flat row list.
///
/// Two passes over an index arena: first an id to row-index map, then a
/// children index of row indices, assembled into owned trees at the end.
/// Rows whose parent id is absent from the row set are excluded from the
/// result and logged.
pub fn build_forest(rows: Vec<FolderRow>) -> Vec<FolderNode> {
    let index: HashMap<i64, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        match row.parent_id {
            None => roots.push(i),
            Some(parent_id) => match index.get(&parent_id) {
                Some(&parent_index) => children[parent_index].push(i),
                None => log::warn!(
                    "Dropping orphaned folder template row id={} (parent {} not in partition)",
                    row.id,
                    parent_id
                ),
            },
        }
    }

    fn assemble(i: usize, rows: &[FolderRow], children: &[Vec<usize>]) -> FolderNode {
        FolderNode {
            id: rows[i].id,
            name: rows[i].name.clone(),
            parent_id: rows[i].parent_id,
            sort_order: rows[i].sort_order,
            children: children[i]
                .iter()
                .map(|&child| assemble(child, rows, children))
                .collect(),
        }
    }

    roots
        .iter()
        .map(|&root| assemble(root, &rows, &children))
        .collect()
}

/// Depth-first pre-order id sequence over a forest.
pub fn flatten_preorder(forest: &[FolderNode]) -> Vec<i64> {
    fn walk(node: &FolderNode, out: &mut Vec<i64>) {
        out.push(node.id);
        for child in &node.children {
            walk(child, out);
        }
    }

    let mut out = Vec::new();
    for node in forest {
        walk(node, &mut out);
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
