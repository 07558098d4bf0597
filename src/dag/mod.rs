// src/dag/mod.rs

//! Suite tree representation and trigger wiring.
//!
//! - [`tree`] holds the arena of suite/family/task nodes.
//! - [`trigger`] contains the trigger algebra and its renderer.
//! - [`validate`] checks that the trigger wiring of a finished tree is sound.

pub mod tree;
pub mod trigger;
pub mod validate;

pub use tree::{Node, NodeId, NodeKind, SuiteTree, check_node_name};
pub use trigger::{Mode, NodeState, TriggerExpr};
pub use validate::validate_triggers;
