// src/dag/tree.rs

//! Arena-backed suite tree: one root, families as containers, tasks as leaves.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::dag::trigger::{Mode, TriggerExpr};
use crate::errors::{CycledagError, Result};

/// Index of a node inside its [`SuiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Family,
    Task,
}

impl NodeKind {
    /// Keyword used in the serialized definition.
    pub fn keyword(self) -> &'static str {
        match self {
            NodeKind::Root => "suite",
            NodeKind::Family => "family",
            NodeKind::Task => "task",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Absolute path, e.g. `/suite/2020010100/Prediction`.
    pub path: String,
    pub variables: BTreeMap<String, String>,
    pub gate: Option<TriggerExpr>,
}

/// Check that `name` can be used as a single path component.
///
/// Names start with a letter, digit or `_` and continue with letters,
/// digits, `_` or `.`.
pub fn check_node_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(CycledagError::InvalidNodeName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };
    let mut chars = name.chars();
    match chars.next() {
        None => return invalid("name is empty"),
        Some(c) if !(c.is_ascii_alphanumeric() || c == '_') => {
            return invalid("must start with a letter, digit or '_'");
        }
        Some(_) => {}
    }
    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '.')) {
        return invalid("only letters, digits, '_' and '.' are allowed");
    }
    Ok(())
}

/// Owns every node of one suite build.
#[derive(Debug, Clone)]
pub struct SuiteTree {
    nodes: Vec<Node>,
    by_path: HashMap<String, NodeId>,
}

impl SuiteTree {
    /// Create a tree holding only the root node.
    ///
    /// `root_name` is not checked here; see [`check_node_name`].
    pub fn new(root_name: &str) -> Self {
        let path = format!("/{root_name}");
        let root = Node {
            name: root_name.to_string(),
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
            path: path.clone(),
            variables: BTreeMap::new(),
            gate: None,
        };
        let mut by_path = HashMap::new();
        by_path.insert(path, NodeId(0));
        Self {
            nodes: vec![root],
            by_path,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a family or task below `parent`.
    ///
    /// Fails with [`CycledagError::InvalidNodeName`] for names rejected by
    /// [`check_node_name`] and with [`CycledagError::DuplicateNode`] if
    /// `parent` already has a child called `name`.
    pub fn add_child(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> Result<NodeId> {
        check_node_name(name)?;
        let parent_path = self.nodes[parent.0].path.clone();
        if kind == NodeKind::Root || self.nodes[parent.0].kind == NodeKind::Task {
            return Err(CycledagError::Other(anyhow::anyhow!(
                "cannot add {} '{}' under '{}'",
                kind.keyword(),
                name,
                parent_path
            )));
        }

        let path = format!("{parent_path}/{name}");
        if self.by_path.contains_key(&path) {
            return Err(CycledagError::DuplicateNode {
                parent: parent_path,
                name: name.to_string(),
            });
        }

        let id = NodeId(self.nodes.len());
        trace!(%path, kind = kind.keyword(), "adding node");
        self.nodes.push(Node {
            name: name.to_string(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            path: path.clone(),
            variables: BTreeMap::new(),
            gate: None,
        });
        self.nodes[parent.0].children.push(id);
        self.by_path.insert(path, id);
        Ok(id)
    }

    pub fn add_variable(&mut self, node: NodeId, key: &str, value: impl Into<String>) {
        self.nodes[node.0]
            .variables
            .insert(key.to_string(), value.into());
    }

    /// Set the gate of a freshly created node. Empty expressions are dropped.
    pub fn attach_gate(&mut self, node: NodeId, expr: TriggerExpr) {
        self.nodes[node.0].gate = if expr.is_empty() { None } else { Some(expr) };
    }

    /// Add a condition to a node's existing gate, joined with `mode`.
    ///
    /// If the node has no gate yet, `expr` becomes its gate.
    pub fn append_gate(&mut self, node: NodeId, expr: TriggerExpr, mode: Mode) {
        if expr.is_empty() {
            return;
        }
        let slot = &mut self.nodes[node.0].gate;
        *slot = match slot.take() {
            Some(existing) => Some(TriggerExpr::extend(existing, expr, mode)),
            None => Some(expr),
        };
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn path(&self, id: NodeId) -> &str {
        &self.nodes[id.0].path
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child of `parent` called `name`, if any.
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].name == name)
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first walk from the root in creation order, with depth.
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for child in self.nodes[id.0].children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// Iterate over all nodes in arena (creation) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}
