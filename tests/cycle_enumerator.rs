use chrono::Duration;

use cycledag::config::{ListUnit, MemberLists};
use cycledag::cycle::{Schedule, cycles_from_config, expand_list, get_total_unique_hh_list};
use cycledag::errors::CycledagError;
use cycledag_test_utils::builders::{ConfigFileBuilder, dtg};

fn lists(hh: &str, ll: &str) -> MemberLists {
    MemberLists {
        member: "0".to_string(),
        hh_list: hh.to_string(),
        ll_list: ll.to_string(),
        hh_path: "general.hh_list".to_string(),
        ll_path: "general.ll_list".to_string(),
    }
}

#[test]
fn test_expand_values_and_ranges() {
    let minutes = expand_list("general.hh_list", "0-21:3", ListUnit::Hours).unwrap();
    assert_eq!(minutes, vec![0, 180, 360, 540, 720, 900, 1080, 1260]);

    let minutes = expand_list("general.ll_list", "48, 3,6", ListUnit::Hours).unwrap();
    assert_eq!(minutes, vec![2880, 180, 360]);

    let minutes = expand_list("general.hh_list", "00-02", ListUnit::Hours).unwrap();
    assert_eq!(minutes, vec![0, 60, 120]);
}

#[test]
fn test_expand_sub_hourly_steps() {
    let minutes = expand_list("general.hh_list", "0-1:0.25", ListUnit::SubHourly).unwrap();
    assert_eq!(minutes, vec![0, 15, 30, 45, 60]);
}

#[test]
fn test_step_not_whole_minute() {
    match expand_list("general.hh_list", "0-1:0.01", ListUnit::SubHourly) {
        Err(CycledagError::StepNotWholeMinute { path, value }) => {
            assert_eq!(path, "general.hh_list");
            assert_eq!(value, "0.01");
        }
        other => panic!("expected StepNotWholeMinute, got {other:?}"),
    }
}

#[test]
fn test_fractional_hours_need_sub_hourly_timestep() {
    let err = expand_list("general.hh_list", "0.5", ListUnit::Hours).unwrap_err();
    assert!(matches!(err, CycledagError::ConfigInconsistency { .. }));
}

#[test]
fn test_malformed_token_reports_path() {
    match expand_list("members.1.ll_list", "3,x", ListUnit::Hours) {
        Err(CycledagError::ConfigInconsistency { path, value, .. }) => {
            assert_eq!(path, "members.1.ll_list");
            assert_eq!(value, "x");
        }
        other => panic!("expected ConfigInconsistency, got {other:?}"),
    }
}

#[test]
fn test_six_hourly_schedule_has_six_hour_intervals() {
    let cfg = ConfigFileBuilder::new("2020010100", "2020010218")
        .hh_list("0,6,12,18")
        .ll_list("3")
        .build();
    let cycles = cycles_from_config(&cfg).unwrap();

    assert_eq!(cycles.len(), 8);
    let first_day: Vec<_> = cycles
        .iter()
        .filter(|c| c.basetime < dtg("2020010200"))
        .collect();
    assert_eq!(first_day.len(), 4);
    for cycle in &cycles {
        assert_eq!(cycle.interval, Duration::hours(6));
        assert_eq!(cycle.lead, Duration::hours(3));
    }
}

#[test]
fn test_three_hourly_range_wraps_midnight() {
    let schedule = Schedule::from_lists(&lists("0-21:3", "3"), ListUnit::Hours).unwrap();
    for offset in schedule.offsets() {
        assert_eq!(schedule.fcint(offset), Some(Duration::hours(3)));
    }

    let cfg = ConfigFileBuilder::new("2020010118", "2020010203")
        .hh_list("0-21:3")
        .build();
    let cycles = cycles_from_config(&cfg).unwrap();
    let basetimes: Vec<_> = cycles.iter().map(|c| c.basetime).collect();
    assert_eq!(
        basetimes,
        vec![
            dtg("2020010118"),
            dtg("2020010121"),
            dtg("2020010200"),
            dtg("2020010203")
        ]
    );
    assert!(cycles.iter().all(|c| c.interval == Duration::hours(3)));
}

#[test]
fn test_single_hour_repeats_daily() {
    let schedule = Schedule::from_lists(&lists("6", "24"), ListUnit::Hours).unwrap();
    assert_eq!(schedule.fcint(360), Some(Duration::hours(24)));
    assert_eq!(schedule.fcint(0), None);
}

#[test]
fn test_uneven_hours_give_uneven_intervals() {
    let schedule = Schedule::from_lists(&lists("0,3,12", "6"), ListUnit::Hours).unwrap();
    assert_eq!(schedule.fcint(0), Some(Duration::hours(3)));
    assert_eq!(schedule.fcint(180), Some(Duration::hours(9)));
    assert_eq!(schedule.fcint(720), Some(Duration::hours(12)));
}

#[test]
fn test_lead_times_cycle_when_shorter() {
    let schedule = Schedule::from_lists(&lists("0,6,12,18", "48,3"), ListUnit::Hours).unwrap();
    assert_eq!(schedule.lead(0), Some(Duration::hours(48)));
    assert_eq!(schedule.lead(360), Some(Duration::hours(3)));
    assert_eq!(schedule.lead(720), Some(Duration::hours(48)));
    assert_eq!(schedule.lead(1080), Some(Duration::hours(3)));
}

#[test]
fn test_hour_listed_twice_is_rejected() {
    let err = Schedule::from_lists(&lists("0,6,6", "3"), ListUnit::Hours).unwrap_err();
    assert!(matches!(err, CycledagError::ConfigInconsistency { .. }));
}

#[test]
fn test_unique_hours_across_members() {
    let a = Schedule::from_lists(&lists("0,12", "3"), ListUnit::Hours).unwrap();
    let b = Schedule::from_lists(&lists("0,6,18", "3"), ListUnit::Hours).unwrap();
    assert_eq!(get_total_unique_hh_list(&[a, b]), vec![0, 360, 720, 1080]);
}

#[test]
fn test_members_are_merged_and_deduplicated() {
    let cfg = ConfigFileBuilder::new("2020010100", "2020010118")
        .member("0", Some("0,12"), None)
        .member("1", Some("0,6,12,18"), Some("6"))
        .build();
    let cycles = cycles_from_config(&cfg).unwrap();

    let basetimes: Vec<_> = cycles.iter().map(|c| c.basetime).collect();
    assert_eq!(
        basetimes,
        vec![
            dtg("2020010100"),
            dtg("2020010106"),
            dtg("2020010112"),
            dtg("2020010118")
        ]
    );
    // Shared basetimes keep the shorter interval and the longer lead time.
    assert_eq!(cycles[0].interval, Duration::hours(6));
    assert_eq!(cycles[0].lead, Duration::hours(6));
}

#[test]
fn test_unscheduled_start_hour_fails() {
    let cfg = ConfigFileBuilder::new("2020010103", "2020010118")
        .hh_list("0,6,12,18")
        .build();
    match cycles_from_config(&cfg) {
        Err(CycledagError::NoIntervalFound { basetime, hour }) => {
            assert_eq!(basetime, dtg("2020010103"));
            assert_eq!(hour, 3);
        }
        other => panic!("expected NoIntervalFound, got {other:?}"),
    }
}

#[test]
fn test_sub_hourly_cycles() {
    let cfg = ConfigFileBuilder::new("2020010100", "2020010101")
        .timestep("60s")
        .cycle_length("30m")
        .ll_list("0.5")
        .build();
    let cycles = cycles_from_config(&cfg).unwrap();
    assert_eq!(cycles.len(), 3);
    assert!(cycles.iter().all(|c| c.interval == Duration::minutes(30)));
}

fn config_error_path(result: cycledag::errors::Result<Vec<cycledag::cycle::Cycle>>) -> String {
    match result {
        Err(CycledagError::ConfigInconsistency { path, .. }) => path,
        other => panic!("expected ConfigInconsistency, got {other:?}"),
    }
}

#[test]
fn test_oversized_hour_is_a_config_error() {
    let cfg = ConfigFileBuilder::new("2020010100", "2020010118")
        .hh_list("0,153722867280912931")
        .build();
    assert_eq!(config_error_path(cycles_from_config(&cfg)), "general.hh_list");

    let cfg = ConfigFileBuilder::new("2020010100", "2020010118")
        .hh_list("0,99999999999999999999999")
        .build();
    assert_eq!(config_error_path(cycles_from_config(&cfg)), "general.hh_list");
}

#[test]
fn test_oversized_lead_time_is_a_config_error() {
    let cfg = ConfigFileBuilder::new("2020010100", "2020010118")
        .ll_list("48,100000000000000")
        .build();
    assert_eq!(config_error_path(cycles_from_config(&cfg)), "general.ll_list");
}

#[test]
fn test_huge_range_is_rejected_before_expansion() {
    match expand_list("general.hh_list", "0-2000000000:1", ListUnit::Hours) {
        Err(CycledagError::ConfigInconsistency { value, reason, .. }) => {
            assert_eq!(value, "0-2000000000:1");
            assert!(reason.contains("1440"), "{reason}");
        }
        other => panic!("expected ConfigInconsistency, got {other:?}"),
    }

    let minutes = expand_list("general.hh_list", "0-23:1", ListUnit::Hours).unwrap();
    assert_eq!(minutes.len(), 24);
}
