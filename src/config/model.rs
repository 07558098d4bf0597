// src/config/model.rs

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;

use crate::types::{InlandWaterScheme, NatureScheme, SeaScheme, SstFormat, TownScheme};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [general]
/// case = "demo"
/// start = "2020-01-01T00:00:00"
/// end = "2020-01-02T00:00:00"
/// cycle_length = "6h"
///
/// [assim.nature]
/// scheme = "OI"
///
/// [observations]
/// nnco = [1, 1, 0, 0, 1]
/// ```
///
/// Only `[general]` is required; every other section has defaults that
/// produce an open-loop (no assimilation) suite.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub general: GeneralSection,

    #[serde(default)]
    pub system: SystemSection,

    #[serde(default)]
    pub compile: CompileSection,

    #[serde(default)]
    pub prep: PrepSection,

    #[serde(default)]
    pub forcing: ForcingSection,

    #[serde(default)]
    pub assim: AssimSection,

    #[serde(default)]
    pub observations: ObservationsSection,

    /// Per-member schedule overrides from `[members.<n>]`.
    #[serde(default)]
    pub members: BTreeMap<String, MemberSection>,
}

/// `[general]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSection {
    /// Experiment name, also used as the suite name.
    #[serde(default = "default_case")]
    pub case: String,

    /// First basetime, e.g. `"2020-01-01T00:00:00"`.
    pub start: NaiveDateTime,

    /// Last basetime (inclusive).
    pub end: NaiveDateTime,

    /// Spacing of the default hour list, e.g. `"6h"`.
    #[serde(default = "default_cycle_length")]
    pub cycle_length: String,

    /// Hours of day to run, e.g. `"0,6,12,18"` or `"0-21:3"`.
    ///
    /// If `None`, derived from `cycle_length`.
    #[serde(default)]
    pub hh_list: Option<String>,

    /// Lead times, paired with `hh_list` entries (cycled if shorter).
    #[serde(default = "default_ll_list")]
    pub ll_list: String,

    /// Model timestep. When shorter than one hour the hour and lead lists
    /// accept fractional hours and are resolved to minutes.
    #[serde(default)]
    pub timestep: Option<String>,

    /// How many cycles may stage input ahead of the oldest unfinished prediction.
    #[serde(default = "default_input_cycles_ahead")]
    pub input_cycles_ahead: u32,

    /// How far (in hours) forcing may run ahead of post-processing.
    #[serde(default = "default_hours_behind")]
    pub hours_behind: u32,

    /// Build static data once per calendar decade instead of once per run.
    #[serde(default)]
    pub one_decade: bool,
}

fn default_case() -> String {
    "cycledag".to_string()
}

fn default_cycle_length() -> String {
    "3h".to_string()
}

fn default_ll_list() -> String {
    "3".to_string()
}

fn default_input_cycles_ahead() -> u32 {
    3
}

fn default_hours_behind() -> u32 {
    24
}

/// `[system]` section: where things live on the host running the scheduler.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemSection {
    #[serde(default = "default_exp_dir")]
    pub exp_dir: String,

    /// Directory holding the task scripts. Defaults to `<exp_dir>/ecf`.
    #[serde(default)]
    pub ecf_files: Option<String>,

    /// Directory for job output. Defaults to `<exp_dir>/jobout`.
    #[serde(default)]
    pub joboutdir: Option<String>,

    /// Root of the per-task working directories. Defaults to `<exp_dir>/work`.
    #[serde(default)]
    pub work_dir: Option<String>,

    #[serde(default = "default_ecf_tries")]
    pub ecf_tries: u32,
}

fn default_exp_dir() -> String {
    ".".to_string()
}

fn default_ecf_tries() -> u32 {
    1
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            exp_dir: default_exp_dir(),
            ecf_files: None,
            joboutdir: None,
            work_dir: None,
            ecf_tries: default_ecf_tries(),
        }
    }
}

impl SystemSection {
    pub fn effective_ecf_files(&self) -> String {
        self.ecf_files
            .clone()
            .unwrap_or_else(|| format!("{}/ecf", self.exp_dir))
    }

    pub fn effective_joboutdir(&self) -> String {
        self.joboutdir
            .clone()
            .unwrap_or_else(|| format!("{}/jobout", self.exp_dir))
    }

    pub fn effective_work_dir(&self) -> String {
        self.work_dir
            .clone()
            .unwrap_or_else(|| format!("{}/work", self.exp_dir))
    }
}

/// `[compile]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompileSection {
    /// Add a Compilation family building the offline binaries.
    #[serde(default)]
    pub build: bool,
}

/// `[prep]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PrepSection {
    /// Run OfflinePrep for the first cycle. When false the first cycle is a
    /// warm start from an existing first guess.
    #[serde(default = "default_true")]
    pub initial_prep: bool,
}

impl Default for PrepSection {
    fn default() -> Self {
        Self { initial_prep: true }
    }
}

fn default_true() -> bool {
    true
}

/// `[forcing]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ForcingSection {
    /// Add a ModifyForcing task after Forcing.
    #[serde(default)]
    pub modify: bool,
}

/// `[assim]` section with one sub-table per surface tile.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AssimSection {
    #[serde(default)]
    pub nature: NatureSection,

    #[serde(default)]
    pub sea: SeaSection,

    #[serde(default)]
    pub inland_water: InlandWaterSection,

    #[serde(default)]
    pub town: TownSection,

    #[serde(default)]
    pub ekf: EkfSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NatureSection {
    #[serde(default)]
    pub scheme: NatureScheme,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeaSection {
    #[serde(default)]
    pub scheme: SeaScheme,

    #[serde(default)]
    pub sst_format: Option<SstFormat>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct InlandWaterSection {
    #[serde(default)]
    pub scheme: InlandWaterScheme,

    /// Extrapolate water temperatures from the land-sea mask.
    #[serde(default)]
    pub extrapolate: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TownSection {
    #[serde(default)]
    pub scheme: TownScheme,
}

/// `[assim.ekf]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EkfSection {
    /// Control-variable mask (NNCV). Slot 0 is the reference run.
    #[serde(default)]
    pub nncv: Vec<u8>,

    /// Control-variable names, one per `nncv` slot.
    #[serde(default)]
    pub cvar_names: Vec<String>,

    /// Run positive and negative perturbations to check linearity.
    #[serde(default)]
    pub llincheck: bool,
}

/// `[observations]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationsSection {
    /// Active observation slots (NNCO), aligned with `types`.
    #[serde(default)]
    pub nnco: Vec<u8>,

    /// Observation type per slot.
    #[serde(default = "default_obs_types")]
    pub types: Vec<String>,

    /// Hours of day at which snow depth is assimilated. Empty means every cycle.
    #[serde(default)]
    pub snow_cycles: Vec<u32>,

    /// Use satellite snow-cover imagery (CryoClim2json).
    #[serde(default)]
    pub cryo_obs: bool,

    /// Remote archive to fetch observations from (FetchMarsObs).
    #[serde(default)]
    pub mars_archive: Option<String>,
}

fn default_obs_types() -> Vec<String> {
    ["T2M", "HU2M", "WG1", "WG2", "SWE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ObservationsSection {
    fn default() -> Self {
        Self {
            nnco: Vec::new(),
            types: default_obs_types(),
            snow_cycles: Vec::new(),
            cryo_obs: false,
            mars_archive: None,
        }
    }
}

/// `[members.<n>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MemberSection {
    #[serde(default)]
    pub hh_list: Option<String>,

    #[serde(default)]
    pub ll_list: Option<String>,
}

/// Unit the hour and lead-time lists are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUnit {
    /// Whole hours only.
    Hours,
    /// Fractional hours, resolved to whole minutes.
    SubHourly,
}

/// Hour and lead-time list strings for one ensemble member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLists {
    pub member: String,
    pub hh_list: String,
    pub ll_list: String,
    /// Dotted config path of `hh_list`, for error messages.
    pub hh_path: String,
    /// Dotted config path of `ll_list`, for error messages.
    pub ll_path: String,
}

/// Validated configuration.
///
/// Constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), so the
/// rest of the crate can rely on scheme combinations being consistent.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub general: GeneralSection,
    pub system: SystemSection,
    pub compile: CompileSection,
    pub prep: PrepSection,
    pub forcing: ForcingSection,
    pub assim: AssimSection,
    pub observations: ObservationsSection,
    pub members: BTreeMap<String, MemberSection>,
    cycle_length: Duration,
    list_unit: ListUnit,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        raw: RawConfigFile,
        cycle_length: Duration,
        list_unit: ListUnit,
    ) -> Self {
        Self {
            general: raw.general,
            system: raw.system,
            compile: raw.compile,
            prep: raw.prep,
            forcing: raw.forcing,
            assim: raw.assim,
            observations: raw.observations,
            members: raw.members,
            cycle_length,
            list_unit,
        }
    }

    pub fn suite_name(&self) -> &str {
        &self.general.case
    }

    pub fn start(&self) -> NaiveDateTime {
        self.general.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.general.end
    }

    pub fn cycle_length(&self) -> Duration {
        self.cycle_length
    }

    pub fn list_unit(&self) -> ListUnit {
        self.list_unit
    }

    /// Hour list used when neither the member nor `[general]` sets one.
    pub fn default_hh_list(&self) -> String {
        let minutes = self.cycle_length.num_minutes();
        if minutes % 60 == 0 {
            let hours = minutes / 60;
            format!("0-{}:{}", 24 - hours, hours)
        } else {
            let hours = minutes as f64 / 60.0;
            format!("0-{}:{}", 24.0 - hours, hours)
        }
    }

    /// Effective hour/lead lists per ensemble member.
    ///
    /// Without any `[members.<n>]` table there is a single member `"0"`
    /// using the `[general]` lists.
    pub fn member_lists(&self) -> Vec<MemberLists> {
        let general_hh = self
            .general
            .hh_list
            .clone()
            .unwrap_or_else(|| self.default_hh_list());

        if self.members.is_empty() {
            return vec![MemberLists {
                member: "0".to_string(),
                hh_list: general_hh,
                ll_list: self.general.ll_list.clone(),
                hh_path: "general.hh_list".to_string(),
                ll_path: "general.ll_list".to_string(),
            }];
        }

        self.members
            .iter()
            .map(|(member, m)| MemberLists {
                member: member.clone(),
                hh_list: m.hh_list.clone().unwrap_or_else(|| general_hh.clone()),
                ll_list: m
                    .ll_list
                    .clone()
                    .unwrap_or_else(|| self.general.ll_list.clone()),
                hh_path: match m.hh_list {
                    Some(_) => format!("members.{member}.hh_list"),
                    None => "general.hh_list".to_string(),
                },
                ll_path: match m.ll_list {
                    Some(_) => format!("members.{member}.ll_list"),
                    None => "general.ll_list".to_string(),
                },
            })
            .collect()
    }
}
