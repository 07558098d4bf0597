// src/config/mod.rs

//! Configuration loading and validation for cycledag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate scheme combinations and tables (`validate.rs`).
//! - Parse duration strings such as `"6h"` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    AssimSection, CompileSection, ConfigFile, EkfSection, ForcingSection, GeneralSection,
    InlandWaterSection, ListUnit, MemberLists, MemberSection, NatureSection,
    ObservationsSection, PrepSection, RawConfigFile, SeaSection, SystemSection, TownSection,
};
