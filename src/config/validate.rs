// src/config/validate.rs

use chrono::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, ListUnit, RawConfigFile};
use crate::dag::check_node_name;
use crate::errors::{CycledagError, Result};
use crate::types::{InlandWaterScheme, NatureScheme, ObsVariable, SeaScheme};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CycledagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let (cycle_length, list_unit) = validate_general(&raw)?;
        validate_observations(&raw)?;
        validate_schemes(&raw)?;
        Ok(ConfigFile::new_unchecked(raw, cycle_length, list_unit))
    }
}

fn validate_general(cfg: &RawConfigFile) -> Result<(Duration, ListUnit)> {
    let general = &cfg.general;

    if let Err(CycledagError::InvalidNodeName { reason, .. }) = check_node_name(&general.case) {
        return Err(CycledagError::config("general.case", &general.case, reason));
    }

    if general.end < general.start {
        return Err(CycledagError::config(
            "general.end",
            general.end,
            format!("end is before start ({})", general.start),
        ));
    }

    let list_unit = match general.timestep.as_deref() {
        Some(ts) => {
            let timestep = parse_duration("general.timestep", ts)?;
            if timestep < Duration::hours(1) {
                ListUnit::SubHourly
            } else {
                ListUnit::Hours
            }
        }
        None => ListUnit::Hours,
    };

    let cycle_length = parse_duration("general.cycle_length", &general.cycle_length)?;
    if cycle_length.num_seconds() % 60 != 0 {
        return Err(CycledagError::StepNotWholeMinute {
            path: "general.cycle_length".to_string(),
            value: general.cycle_length.clone(),
        });
    }
    let cycle_minutes = cycle_length.num_minutes();
    if cycle_minutes > 24 * 60 || (24 * 60) % cycle_minutes != 0 {
        return Err(CycledagError::config(
            "general.cycle_length",
            &general.cycle_length,
            "cycle length must divide 24h",
        ));
    }
    if cycle_minutes % 60 != 0 && list_unit == ListUnit::Hours {
        return Err(CycledagError::config(
            "general.cycle_length",
            &general.cycle_length,
            "sub-hour cycle length requires a sub-hour general.timestep",
        ));
    }

    if general.input_cycles_ahead == 0 {
        return Err(CycledagError::config(
            "general.input_cycles_ahead",
            general.input_cycles_ahead,
            "must be >= 1",
        ));
    }

    if general.hours_behind == 0 {
        return Err(CycledagError::config(
            "general.hours_behind",
            general.hours_behind,
            "must be >= 1",
        ));
    }

    Ok((cycle_length, list_unit))
}

fn validate_observations(cfg: &RawConfigFile) -> Result<()> {
    let obs = &cfg.observations;

    if !obs.nnco.is_empty() && obs.nnco.len() != obs.types.len() {
        return Err(CycledagError::config(
            "observations.nnco",
            format!("{:?}", obs.nnco),
            format!(
                "has {} slots but observations.types has {}",
                obs.nnco.len(),
                obs.types.len()
            ),
        ));
    }

    for (i, flag) in obs.nnco.iter().enumerate() {
        if *flag > 1 {
            return Err(CycledagError::config(
                format!("observations.nnco[{i}]"),
                flag,
                "bitmask entries must be 0 or 1",
            ));
        }
    }

    for (i, obs_type) in obs.types.iter().enumerate() {
        if ObsVariable::from_obs_type(obs_type).is_none() {
            return Err(CycledagError::config(
                format!("observations.types[{i}]"),
                obs_type,
                "no converter for observation type",
            ));
        }
    }

    for (i, hour) in obs.snow_cycles.iter().enumerate() {
        if *hour >= 24 {
            return Err(CycledagError::config(
                format!("observations.snow_cycles[{i}]"),
                hour,
                "hour of day must be < 24",
            ));
        }
    }

    if let Some(archive) = obs.mars_archive.as_deref() {
        if archive.trim().is_empty() {
            return Err(CycledagError::config(
                "observations.mars_archive",
                archive,
                "archive name must not be empty",
            ));
        }
    }

    Ok(())
}

fn validate_schemes(cfg: &RawConfigFile) -> Result<()> {
    let assim = &cfg.assim;

    if assim.nature.scheme == NatureScheme::Ekf {
        let ekf = &assim.ekf;
        if ekf.nncv.is_empty() {
            return Err(CycledagError::config(
                "assim.ekf.nncv",
                "[]",
                "EKF requires a control-variable mask",
            ));
        }
        for (i, flag) in ekf.nncv.iter().enumerate() {
            if *flag > 1 {
                return Err(CycledagError::config(
                    format!("assim.ekf.nncv[{i}]"),
                    flag,
                    "bitmask entries must be 0 or 1",
                ));
            }
        }
        if ekf.cvar_names.len() < ekf.nncv.len() {
            return Err(CycledagError::config(
                "assim.ekf.cvar_names",
                format!("{:?}", ekf.cvar_names),
                format!(
                    "needs a name for each of the {} control variables",
                    ekf.nncv.len()
                ),
            ));
        }
        // Active names become sibling family names next to "REF".
        let mut seen = vec!["REF"];
        for (i, name) in ekf.cvar_names.iter().enumerate().take(ekf.nncv.len()).skip(1) {
            if ekf.nncv[i] != 1 {
                continue;
            }
            if let Err(CycledagError::InvalidNodeName { reason, .. }) = check_node_name(name) {
                return Err(CycledagError::config(
                    format!("assim.ekf.cvar_names[{i}]"),
                    name,
                    reason,
                ));
            }
            if seen.contains(&name.as_str()) {
                return Err(CycledagError::config(
                    format!("assim.ekf.cvar_names[{i}]"),
                    name,
                    "control-variable names must be unique and not \"REF\"",
                ));
            }
            seen.push(name.as_str());
        }
    }

    if assim.sea.scheme == SeaScheme::Input && assim.sea.sst_format.is_none() {
        return Err(CycledagError::config(
            "assim.sea.sst_format",
            "<unset>",
            "sea scheme INPUT requires an SST format",
        ));
    }

    if assim.inland_water.extrapolate && assim.inland_water.scheme == InlandWaterScheme::None {
        return Err(CycledagError::config(
            "assim.inland_water.extrapolate",
            true,
            "water extrapolation requires an inland-water scheme other than NONE",
        ));
    }

    Ok(())
}
