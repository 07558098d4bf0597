// src/dag/trigger.rs

//! Trigger algebra: boolean conditions over node states.
//!
//! [`TriggerExpr::render`] is the only place that knows the scheduler's
//! expression syntax; everything else builds expressions structurally.

use std::fmt;

/// Node state a trigger leaf tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    Complete,
    Aborted,
    Active,
    Queued,
    Submitted,
}

impl NodeState {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeState::Complete => "complete",
            NodeState::Aborted => "aborted",
            NodeState::Active => "active",
            NodeState::Queued => "queued",
            NodeState::Submitted => "submitted",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean operator joining sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    And,
    Or,
}

impl Mode {
    fn separator(self) -> &'static str {
        match self {
            Mode::And => " AND ",
            Mode::Or => " OR ",
        }
    }
}

/// A dependency condition.
///
/// Leaves carry the absolute path of the node they test; paths never change
/// after a node is created, so rendering needs no access to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerExpr {
    Leaf { path: String, state: NodeState },
    And(Vec<TriggerExpr>),
    Or(Vec<TriggerExpr>),
}

impl TriggerExpr {
    pub fn leaf(path: impl Into<String>, state: NodeState) -> Self {
        TriggerExpr::Leaf {
            path: path.into(),
            state,
        }
    }

    /// `<path> == complete`.
    pub fn complete(path: impl Into<String>) -> Self {
        Self::leaf(path, NodeState::Complete)
    }

    /// The expression with no constraint.
    pub fn empty() -> Self {
        TriggerExpr::And(Vec::new())
    }

    /// Join the present entries with `mode`; `None` entries are skipped.
    ///
    /// If nothing is left the result is [`TriggerExpr::empty`].
    pub fn combine<I>(items: I, mode: Mode) -> Self
    where
        I: IntoIterator<Item = Option<TriggerExpr>>,
    {
        let parts: Vec<TriggerExpr> = items.into_iter().flatten().collect();
        match mode {
            Mode::And => TriggerExpr::And(parts),
            Mode::Or => TriggerExpr::Or(parts),
        }
    }

    /// [`TriggerExpr::combine`] with [`Mode::And`].
    pub fn all<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Option<TriggerExpr>>,
    {
        Self::combine(items, Mode::And)
    }

    /// Join two built expressions, keeping `existing` intact as the left operand.
    pub fn extend(existing: TriggerExpr, additional: TriggerExpr, mode: Mode) -> Self {
        Self::combine([Some(existing), Some(additional)], mode)
    }

    /// True when the expression contains no leaf at all.
    pub fn is_empty(&self) -> bool {
        match self {
            TriggerExpr::Leaf { .. } => false,
            TriggerExpr::And(xs) | TriggerExpr::Or(xs) => xs.iter().all(TriggerExpr::is_empty),
        }
    }

    /// All leaves in rendering order.
    pub fn leaves(&self) -> Vec<(&str, NodeState)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, NodeState)>) {
        match self {
            TriggerExpr::Leaf { path, state } => out.push((path.as_str(), *state)),
            TriggerExpr::And(xs) | TriggerExpr::Or(xs) => {
                for x in xs {
                    x.collect_leaves(out);
                }
            }
        }
    }

    /// Render to the scheduler's trigger syntax. Empty expressions render to `""`.
    pub fn render(&self) -> String {
        match self {
            TriggerExpr::Leaf { path, state } => format!("{path} == {state}"),
            TriggerExpr::And(xs) => render_group(xs, Mode::And),
            TriggerExpr::Or(xs) => render_group(xs, Mode::Or),
        }
    }
}

fn render_group(xs: &[TriggerExpr], mode: Mode) -> String {
    let parts: Vec<String> = xs
        .iter()
        .filter(|x| !x.is_empty())
        .map(TriggerExpr::render)
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    format!("({})", parts.join(mode.separator()))
}

impl fmt::Display for TriggerExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
