// src/cycle/schedule.rs

use std::collections::BTreeSet;

use chrono::Duration;

use crate::config::{ListUnit, MemberLists};
use crate::cycle::lists::expand_list;
use crate::errors::{CycledagError, Result};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// One scheduled start time within the day and its lead time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduleEntry {
    /// Minutes after midnight.
    offset: i64,
    /// Lead time in minutes.
    lead: i64,
}

/// Daily schedule of one ensemble member, sorted by offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub member: String,
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Expand the member's hour and lead lists and pair them up.
    ///
    /// The n-th hour gets the n-th lead time; the lead list is cycled when
    /// it is shorter than the hour list.
    pub fn from_lists(lists: &MemberLists, unit: ListUnit) -> Result<Self> {
        let hours = expand_list(&lists.hh_path, &lists.hh_list, unit)?;
        let leads = expand_list(&lists.ll_path, &lists.ll_list, unit)?;

        let mut entries = Vec::with_capacity(hours.len());
        let mut seen = BTreeSet::new();
        for (i, offset) in hours.iter().copied().enumerate() {
            if offset >= MINUTES_PER_DAY {
                return Err(CycledagError::config(
                    &lists.hh_path,
                    &lists.hh_list,
                    format!("hour {} is not within a day", offset as f64 / 60.0),
                ));
            }
            if !seen.insert(offset) {
                return Err(CycledagError::config(
                    &lists.hh_path,
                    &lists.hh_list,
                    format!("hour {} is listed twice", offset as f64 / 60.0),
                ));
            }
            entries.push(ScheduleEntry {
                offset,
                lead: leads[i % leads.len()],
            });
        }
        entries.sort_by_key(|e| e.offset);

        Ok(Self {
            member: lists.member.clone(),
            entries,
        })
    }

    /// Scheduled offsets in minutes after midnight, ascending.
    pub fn offsets(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.offset).collect()
    }

    fn position(&self, offset: i64) -> Option<usize> {
        self.entries.iter().position(|e| e.offset == offset)
    }

    /// Forecast interval after the cycle starting at `offset`.
    ///
    /// This is the gap to the next scheduled offset, wrapping past midnight.
    /// A single-entry schedule repeats every 24h. Returns `None` if `offset`
    /// is not scheduled.
    pub fn fcint(&self, offset: i64) -> Option<Duration> {
        let i = self.position(offset)?;
        let next = self.entries[(i + 1) % self.entries.len()].offset;
        let gap = (next - offset).rem_euclid(MINUTES_PER_DAY);
        let gap = if gap == 0 { MINUTES_PER_DAY } else { gap };
        Some(Duration::minutes(gap))
    }

    /// Lead time of the cycle starting at `offset`.
    pub fn lead(&self, offset: i64) -> Option<Duration> {
        let i = self.position(offset)?;
        Some(Duration::minutes(self.entries[i].lead))
    }
}

/// Union of the scheduled offsets of all members, ascending.
pub fn get_total_unique_hh_list(schedules: &[Schedule]) -> Vec<i64> {
    schedules
        .iter()
        .flat_map(|s| s.entries.iter().map(|e| e.offset))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
