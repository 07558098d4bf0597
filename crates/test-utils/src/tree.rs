//! Lookup helpers for asserting on assembled suite trees.

use cycledag::dag::SuiteTree;

/// Names of the direct children of the node at `path`.
pub fn child_names(tree: &SuiteTree, path: &str) -> Vec<String> {
    let id = tree
        .find(path)
        .unwrap_or_else(|| panic!("no node at {path}"));
    tree.children(id)
        .iter()
        .map(|c| tree.node(*c).name.clone())
        .collect()
}

/// Rendered gate of the node at `path` (`""` when ungated).
pub fn gate(tree: &SuiteTree, path: &str) -> String {
    let id = tree
        .find(path)
        .unwrap_or_else(|| panic!("no node at {path}"));
    tree.node(id)
        .gate
        .as_ref()
        .map(|g| g.render())
        .unwrap_or_default()
}

/// Variable `key` of the node at `path`.
pub fn var(tree: &SuiteTree, path: &str, key: &str) -> Option<String> {
    let id = tree.find(path)?;
    tree.node(id).variables.get(key).cloned()
}

pub fn exists(tree: &SuiteTree, path: &str) -> bool {
    tree.find(path).is_some()
}
