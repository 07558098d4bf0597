// src/suite/predicates.rs

//! Configuration-driven branch decisions, kept free of graph building so
//! each one can be checked against a literal config.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::config::ConfigFile;
use crate::types::{InlandWaterScheme, NatureScheme, ObsVariable, SeaScheme, SstFormat, TownScheme};

/// Variable classes that get their own analysis branch, in branch order.
pub const ANALYSED_VARIABLES: [ObsVariable; 3] = [
    ObsVariable::Temperature,
    ObsVariable::Humidity,
    ObsVariable::SnowDepth,
];

/// Any surface tile has an assimilation scheme other than NONE.
pub fn any_assimilation(cfg: &ConfigFile) -> bool {
    cfg.assim.nature.scheme != NatureScheme::None
        || cfg.assim.sea.scheme != SeaScheme::None
        || cfg.assim.inland_water.scheme != InlandWaterScheme::None
        || cfg.assim.town.scheme != TownScheme::None
}

pub fn oi_active(cfg: &ConfigFile) -> bool {
    cfg.assim.nature.scheme == NatureScheme::Oi
}

pub fn ekf_active(cfg: &ConfigFile) -> bool {
    cfg.assim.nature.scheme == NatureScheme::Ekf
}

/// Observation slot `i` is switched on in the NNCO bitmask.
fn slot_active(cfg: &ConfigFile, i: usize) -> bool {
    cfg.observations.nnco.get(i).copied() == Some(1)
}

/// Snow depth is analysed at `basetime`.
pub fn snow_cycle(cfg: &ConfigFile, basetime: NaiveDateTime) -> bool {
    let cycles = &cfg.observations.snow_cycles;
    cycles.is_empty() || cycles.contains(&basetime.hour())
}

/// Analysed variable classes with at least one active observation slot at
/// `basetime`, in [`ANALYSED_VARIABLES`] order.
pub fn active_obs_vars(cfg: &ConfigFile, basetime: NaiveDateTime) -> Vec<ObsVariable> {
    let mapped: Vec<ObsVariable> = cfg
        .observations
        .types
        .iter()
        .enumerate()
        .filter(|(i, _)| slot_active(cfg, *i))
        .filter_map(|(_, t)| ObsVariable::from_obs_type(t))
        .collect();

    ANALYSED_VARIABLES
        .into_iter()
        .filter(|var| mapped.contains(var))
        .filter(|var| *var != ObsVariable::SnowDepth || snow_cycle(cfg, basetime))
        .collect()
}

/// Run the surface analysis (SODA) branch at `basetime`.
pub fn do_soda(cfg: &ConfigFile, basetime: NaiveDateTime) -> bool {
    any_assimilation(cfg) && !active_obs_vars(cfg, basetime).is_empty()
}

pub fn needs_prepare_sst(cfg: &ConfigFile) -> bool {
    cfg.assim.sea.scheme == SeaScheme::Input && cfg.assim.sea.sst_format == Some(SstFormat::Ascii)
}

pub fn needs_prepare_lsm(cfg: &ConfigFile) -> bool {
    oi_active(cfg) || cfg.assim.inland_water.extrapolate
}

pub fn needs_cryo_clim(cfg: &ConfigFile) -> bool {
    cfg.observations.cryo_obs
}

pub fn needs_fetch_mars_obs(cfg: &ConfigFile, vars: &[ObsVariable]) -> bool {
    !vars.is_empty() && cfg.observations.mars_archive.is_some()
}

/// Whether the first cycle is a cold start from OfflinePrep.
pub fn cold_start(cfg: &ConfigFile, basetime: NaiveDateTime) -> bool {
    basetime == cfg.start() && cfg.prep.initial_prep
}

/// Basetime of the cycle whose prediction gates `basetime`, if it lies
/// within `[start, basetime)`.
pub fn lookahead_basetime(
    start: NaiveDateTime,
    basetime: NaiveDateTime,
    interval: Duration,
    cycles_ahead: u32,
) -> Option<NaiveDateTime> {
    let back = interval * i32::try_from(cycles_ahead).ok()?;
    let earlier = basetime.checked_sub_signed(back)?;
    (earlier >= start && earlier < basetime).then_some(earlier)
}

/// Basetime `hours_behind` before `basetime`.
pub fn lookbehind_basetime(basetime: NaiveDateTime, hours_behind: u32) -> Option<NaiveDateTime> {
    basetime.checked_sub_signed(Duration::hours(i64::from(hours_behind)))
}

/// First day of the calendar decade (1st, 11th or 21st) containing `date`.
pub fn decade_start(date: NaiveDate) -> NaiveDate {
    let day = match date.day() {
        1..=10 => 1,
        11..=20 => 11,
        _ => 21,
    };
    date.with_day(day).unwrap_or(date)
}

/// Decade start dates covering `[start, end]`.
pub fn decades_between(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut decade = decade_start(start.date());
    while decade <= end.date() {
        out.push(decade);
        let next = match decade.day() {
            1 => decade.with_day(11),
            11 => decade.with_day(21),
            _ => first_of_next_month(decade),
        };
        match next {
            Some(next) => decade = next,
            None => break,
        }
    }
    out
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}
