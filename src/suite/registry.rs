// src/suite/registry.rs

//! Task registry: which task names the suite may reference, and how each
//! one's node variables are produced.
//!
//! The registry is populated once at startup and handed to the assembler,
//! so tests can inject a reduced or customised set.

use std::collections::BTreeMap;

use crate::errors::{CycledagError, Result};

/// Inputs available to a task factory when a task node is created.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub name: &'a str,
    /// Absolute node path of the new task.
    pub node_path: &'a str,
    /// Root of the per-task working directories.
    pub work_dir: &'a str,
    /// `key=value;key=value` argument string, possibly empty.
    pub args: &'a str,
}

/// Produces the variables attached to a task node.
pub type TaskFactory = fn(&TaskContext<'_>) -> BTreeMap<String, String>;

/// Working directory under `work_dir` mirroring the node path, plus `ARGS`
/// when the task has arguments.
pub fn standard_task(ctx: &TaskContext<'_>) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert(
        "WRKDIR".to_string(),
        format!("{}{}", ctx.work_dir.trim_end_matches('/'), ctx.node_path),
    );
    if !ctx.args.is_empty() {
        vars.insert("ARGS".to_string(), ctx.args.to_string());
    }
    vars
}

/// Every task the standard suite layout references.
pub const STANDARD_TASKS: &[&str] = &[
    "InitRun",
    "SyncSourceCode",
    "ConfigureOfflineBinaries",
    "MakeOfflineBinaries",
    "Pgd",
    "PrepareCycle",
    "Forcing",
    "ModifyForcing",
    "OfflinePrep",
    "CycleFirstGuess",
    "FirstGuess",
    "PerturbedRun",
    "PrepareOiSoilInput",
    "PrepareOiClimate",
    "PrepareSST",
    "PrepareLSM",
    "FirstGuess4OI",
    "CryoClim2json",
    "FetchMarsObs",
    "QualityControl",
    "OptimalInterpolation",
    "Oi2soda",
    "Soda",
    "Forecast",
    "LogProgress",
    "Qc2obsmon",
    "LogProgressPP",
];

#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    factories: BTreeMap<String, TaskFactory>,
}

impl TaskRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with [`STANDARD_TASKS`] all mapped to [`standard_task`].
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for name in STANDARD_TASKS {
            registry.register(name, standard_task);
        }
        registry
    }

    /// Add or replace the factory for `name`.
    pub fn register(&mut self, name: &str, factory: TaskFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn lookup(&self, name: &str) -> Result<TaskFactory> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| CycledagError::UnknownTask(name.to_string()))
    }
}
