// src/suite/mod.rs

//! Suite assembly.
//!
//! - [`assembler`] walks the cycles and builds the suite tree.
//! - [`predicates`] holds the config-driven branch decisions.
//! - [`perturbations`] computes the EKF perturbation fan-out.
//! - [`handles`] is the per-build `basetime -> nodes` side table.
//! - [`registry`] maps task names to the factories that describe them.

pub mod assembler;
pub mod handles;
pub mod perturbations;
pub mod predicates;
pub mod registry;

pub use assembler::{Suite, SuiteAssembler, cycle_family_name};
pub use handles::{CycleHandle, CycleHandles};
pub use perturbations::{PertSign, PerturbationBranch, PerturbedRun, perturbation_plan};
pub use registry::{STANDARD_TASKS, TaskContext, TaskFactory, TaskRegistry, standard_task};
