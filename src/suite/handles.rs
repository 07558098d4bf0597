// src/suite/handles.rs

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::dag::NodeId;

/// Nodes of one cycle that later cycles wire triggers against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleHandle {
    pub cycle_input: NodeId,
    pub prediction: NodeId,
    pub post_processing: NodeId,
}

/// Side table `basetime -> handles`, filled as cycles are built.
///
/// Lives only for one build; lookups of cycles that do not exist return
/// `None` and the caller leaves the clause out.
#[derive(Debug, Clone, Default)]
pub struct CycleHandles {
    by_basetime: BTreeMap<NaiveDateTime, CycleHandle>,
}

impl CycleHandles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, basetime: NaiveDateTime, handle: CycleHandle) {
        self.by_basetime.insert(basetime, handle);
    }

    pub fn lookup(&self, basetime: NaiveDateTime) -> Option<&CycleHandle> {
        self.by_basetime.get(&basetime)
    }
}
