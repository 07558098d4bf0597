// src/definition.rs

//! Serialization of a finished suite tree into the scheduler's definition
//! text.
//!
//! Output is a pure function of the tree: children in creation order,
//! variables in key order, triggers through [`TriggerExpr::render`]. Two
//! builds from the same configuration therefore produce identical bytes.
//!
//! [`TriggerExpr::render`]: crate::dag::TriggerExpr::render

use std::path::Path;

use tracing::info;

use crate::dag::{NodeId, NodeKind, SuiteTree};
use crate::errors::Result;
use crate::fs::FileSystem;

const INDENT: &str = "  ";

/// Render the whole tree.
pub fn to_definition(tree: &SuiteTree) -> String {
    let mut out = String::new();
    out.push_str("# cycledag suite definition\n");
    write_node(tree, tree.root(), 0, &mut out);
    out
}

fn write_node(tree: &SuiteTree, id: NodeId, depth: usize, out: &mut String) {
    let node = tree.node(id);
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);

    out.push_str(&format!("{pad}{} {}\n", node.kind.keyword(), node.name));

    if let Some(gate) = node.gate.as_ref() {
        let rendered = gate.render();
        if !rendered.is_empty() {
            out.push_str(&format!("{inner}trigger {rendered}\n"));
        }
    }

    for (key, value) in &node.variables {
        out.push_str(&format!("{inner}edit {key} '{}'\n", escape(value)));
    }

    for child in tree.children(id) {
        write_node(tree, *child, depth + 1, out);
    }

    match node.kind {
        NodeKind::Root => out.push_str(&format!("{pad}endsuite\n")),
        NodeKind::Family => out.push_str(&format!("{pad}endfamily\n")),
        NodeKind::Task => {}
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Render the tree and write it to `path`.
pub fn write_definition(fs: &dyn FileSystem, path: &Path, tree: &SuiteTree) -> Result<()> {
    let text = to_definition(tree);
    fs.write(path, text.as_bytes())?;
    info!(path = %path.display(), bytes = text.len(), "wrote suite definition");
    Ok(())
}
