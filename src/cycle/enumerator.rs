// src/cycle/enumerator.rs

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::debug;

use crate::config::ConfigFile;
use crate::cycle::schedule::Schedule;
use crate::errors::{CycledagError, Result};

/// One forecast start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub basetime: NaiveDateTime,
    /// Time until the next cycle of the same member.
    pub interval: Duration,
    pub lead: Duration,
}

/// Build the schedule of every ensemble member in the configuration.
pub fn member_schedules(cfg: &ConfigFile) -> Result<Vec<Schedule>> {
    cfg.member_lists()
        .iter()
        .map(|lists| Schedule::from_lists(lists, cfg.list_unit()))
        .collect()
}

/// Walk each member's schedule from `start` to `end` (inclusive) and merge
/// the results into one ascending, deduplicated list.
///
/// When members share a basetime, the shortest interval and the longest
/// lead time win.
pub fn enumerate_cycles(
    start: NaiveDateTime,
    end: NaiveDateTime,
    schedules: &[Schedule],
) -> Result<Vec<Cycle>> {
    let mut cycles: BTreeMap<NaiveDateTime, Cycle> = BTreeMap::new();

    for schedule in schedules {
        let mut basetime = start;
        while basetime <= end {
            let offset = i64::from(basetime.num_seconds_from_midnight() / 60);
            let no_interval = || CycledagError::NoIntervalFound {
                basetime,
                hour: basetime.hour(),
            };
            let interval = schedule.fcint(offset).ok_or_else(no_interval)?;
            let lead = schedule.lead(offset).ok_or_else(no_interval)?;

            cycles
                .entry(basetime)
                .and_modify(|c| {
                    c.interval = c.interval.min(interval);
                    c.lead = c.lead.max(lead);
                })
                .or_insert(Cycle {
                    basetime,
                    interval,
                    lead,
                });

            match basetime.checked_add_signed(interval) {
                Some(next) => basetime = next,
                None => break,
            }
        }
        debug!(member = %schedule.member, "enumerated member cycles");
    }

    Ok(cycles.into_values().collect())
}

/// Convenience: schedules plus cycles straight from a validated config.
pub fn cycles_from_config(cfg: &ConfigFile) -> Result<Vec<Cycle>> {
    let schedules = member_schedules(cfg)?;
    enumerate_cycles(cfg.start(), cfg.end(), &schedules)
}
