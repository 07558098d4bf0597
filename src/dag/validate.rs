// src/dag/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::tree::{NodeId, SuiteTree};
use crate::errors::{CycledagError, Result};

/// Check the trigger wiring of a finished tree.
///
/// - every trigger leaf names an existing node
/// - the "waits for" relation between nodes has no cycles
///
/// A failure here is an assembly bug; it keeps the definition from being
/// written.
pub fn validate_triggers(tree: &SuiteTree) -> Result<()> {
    // Edge direction: referenced node -> gated node.
    let mut graph: DiGraphMap<NodeId, ()> = DiGraphMap::new();

    for (id, node) in tree.iter() {
        graph.add_node(id);
        let Some(gate) = node.gate.as_ref() else {
            continue;
        };
        for (reference, _state) in gate.leaves() {
            let dep = tree.find(reference).ok_or_else(|| CycledagError::DanglingTrigger {
                node: node.path.clone(),
                reference: reference.to_string(),
            })?;
            graph.add_edge(dep, id, ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(CycledagError::TriggerCycle(format!(
            "trigger cycle involving '{}'",
            tree.path(cycle.node_id())
        ))),
    }
}
