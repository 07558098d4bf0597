// src/cycle/mod.rs

//! Forecast-cycle enumeration.
//!
//! - [`lists`] expands `HH_LIST`/`LL_LIST` style strings.
//! - [`schedule`] pairs hours with lead times and derives forecast intervals.
//! - [`enumerator`] walks the experiment period into concrete [`Cycle`]s.

pub mod enumerator;
pub mod lists;
pub mod schedule;

pub use enumerator::{Cycle, cycles_from_config, enumerate_cycles, member_schedules};
pub use lists::expand_list;
pub use schedule::{Schedule, get_total_unique_hh_list};
