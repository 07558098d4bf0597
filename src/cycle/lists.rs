// src/cycle/lists.rs

//! Expansion of hour and lead-time list strings.
//!
//! A list is a comma-separated sequence of tokens, each either a single
//! value (`"6"`) or a range `start-end:step` (`"0-21:3"`, step defaults to
//! 1). Values are hours; the expanded result is in minutes so sub-hourly
//! schedules use the same representation.

use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use crate::config::ListUnit;
use crate::errors::{CycledagError, Result};

/// One entry per minute of the day; no schedule can use more.
const MAX_ENTRIES: i64 = 24 * 60;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(\d+(?:\.\d+)?)\s*(?:-\s*(\d+(?:\.\d+)?)\s*(?::\s*(\d+(?:\.\d+)?))?)?\s*$",
        )
        .expect("list token regex is valid")
    })
}

/// Expand a list string into minutes.
///
/// `path` is the dotted config path reported on failure.
pub fn expand_list(path: &str, spec: &str, unit: ListUnit) -> Result<Vec<i64>> {
    if spec.trim().is_empty() {
        return Err(CycledagError::config(path, spec, "list must not be empty"));
    }

    let mut values = Vec::new();
    for token in spec.split(',') {
        let caps = token_regex().captures(token).ok_or_else(|| {
            CycledagError::config(path, token.trim(), "expected a value or a range start-end:step")
        })?;

        let start = to_minutes(path, &caps[1], unit)?;
        let Some(end) = caps.get(2) else {
            values.push(start);
            continue;
        };
        let end = to_minutes(path, end.as_str(), unit)?;
        let step = match caps.get(3) {
            Some(step) => to_minutes(path, step.as_str(), unit)?,
            None => 60,
        };

        if step <= 0 {
            return Err(CycledagError::config(path, token.trim(), "range step must be positive"));
        }
        if end < start {
            return Err(CycledagError::config(path, token.trim(), "range end is before start"));
        }

        let count = (end - start) / step + 1;
        if values.len() as i64 + count > MAX_ENTRIES {
            return Err(CycledagError::config(
                path,
                token.trim(),
                format!("list expands to more than {MAX_ENTRIES} entries"),
            ));
        }
        values.extend((0..count).map(|k| start + k * step));
    }

    Ok(values)
}

/// Convert one hour value to minutes according to the list unit.
fn to_minutes(path: &str, raw: &str, unit: ListUnit) -> Result<i64> {
    let out_of_range = || CycledagError::config(path, raw, "value out of range");
    let minutes = match unit {
        ListUnit::Hours => {
            if raw.contains('.') {
                return Err(CycledagError::config(
                    path,
                    raw,
                    "fractional hours require a sub-hour general.timestep",
                ));
            }
            let hours: i64 = raw.parse().map_err(|_| out_of_range())?;
            hours.checked_mul(60).ok_or_else(out_of_range)?
        }
        ListUnit::SubHourly => {
            let hours: f64 = raw
                .parse()
                .map_err(|_| CycledagError::config(path, raw, "not a number"))?;
            let minutes = hours * 60.0;
            if !minutes.is_finite() || minutes >= i64::MAX as f64 {
                return Err(out_of_range());
            }
            if (minutes - minutes.round()).abs() > 1e-6 {
                return Err(CycledagError::StepNotWholeMinute {
                    path: path.to_string(),
                    value: raw.to_string(),
                });
            }
            minutes.round() as i64
        }
    };

    // Every value ends up as a chrono duration.
    Duration::try_minutes(minutes).ok_or_else(out_of_range)?;
    Ok(minutes)
}
