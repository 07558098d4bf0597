// src/errors.rs

//! Crate-wide error type and result alias.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CycledagError {
    /// A setting is invalid on its own or in combination with another one.
    #[error("Configuration error at `{path}` = {value:?}: {reason}")]
    ConfigInconsistency {
        path: String,
        value: String,
        reason: String,
    },

    #[error("No forecast interval found for hour {hour:02} (cycle {basetime})")]
    NoIntervalFound { basetime: NaiveDateTime, hour: u32 },

    #[error("Step at `{path}` is not a whole number of minutes: {value:?}")]
    StepNotWholeMinute { path: String, value: String },

    #[error("Invalid node name {name:?}: {reason}")]
    InvalidNodeName { name: String, reason: String },

    #[error("Duplicate node '{name}' under '{parent}'")]
    DuplicateNode { parent: String, name: String },

    #[error("Task not found in registry: {0}")]
    UnknownTask(String),

    #[error("Trigger on '{node}' references unknown node '{reference}'")]
    DanglingTrigger { node: String, reference: String },

    #[error("Cycle detected in trigger graph: {0}")]
    TriggerCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CycledagError {
    /// Shorthand for [`CycledagError::ConfigInconsistency`].
    pub fn config(
        path: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        CycledagError::ConfigInconsistency {
            path: path.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CycledagError>;
