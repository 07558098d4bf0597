// src/config/duration.rs

use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use crate::errors::{CycledagError, Result};

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*([hms])\s*$").expect("duration regex is valid")
    })
}

/// Parse a duration string such as `"6h"`, `"15m"` or `"90s"`.
///
/// `path` is the dotted config path reported on failure.
pub fn parse_duration(path: &str, value: &str) -> Result<Duration> {
    let caps = duration_regex().captures(value).ok_or_else(|| {
        CycledagError::config(path, value, "expected a duration like \"6h\", \"15m\" or \"90s\"")
    })?;

    let amount: i64 = caps[1]
        .parse()
        .map_err(|_| CycledagError::config(path, value, "duration amount out of range"))?;

    let duration = match &caps[2] {
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        _ => Duration::try_seconds(amount),
    }
    .ok_or_else(|| CycledagError::config(path, value, "duration amount out of range"))?;

    if duration <= Duration::zero() {
        return Err(CycledagError::config(path, value, "duration must be positive"));
    }

    Ok(duration)
}
