use chrono::{FixedOffset, TimeZone, Utc, Weekday};

use super::calendar::{days_in_month, parse_weekday, start_of_day};
use super::cron::normalize_cron;
use super::gates::{matches_day_of_month, matches_day_of_month_range, parse_range};
use super::*;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().fixed_offset()
}

fn when_days(days: &[i32]) -> When {
    When {
        day_of_month: days.to_vec(),
        ..When::default()
    }
}

// -- normalize_cron ----------------------------------------------------

#[test]
fn normalize_cron_prepends_seconds() {
    assert_eq!(normalize_cron("*/15 * * * *").unwrap(), ["0 */15 * * * *"]);
    assert_eq!(normalize_cron("  30 2 1 * *  ").unwrap(), ["0 30 2 1 * *"]);
}

#[test]
fn normalize_cron_renumbers_weekdays() {
    assert_eq!(normalize_cron("0 6 * * 1-5").unwrap(), ["0 0 6 * * 2,3,4,5,6"]);
    assert_eq!(normalize_cron("0 6 * * 0").unwrap(), ["0 0 6 * * 1"]);
    assert_eq!(normalize_cron("0 6 * * 7").unwrap(), ["0 0 6 * * 1"]);
    assert_eq!(normalize_cron("0 6 * * 5-7").unwrap(), ["0 0 6 * * 1,6,7"]);
    assert_eq!(normalize_cron("0 6 * * */2").unwrap(), ["0 0 6 * * 1,3,5,7"]);
    assert_eq!(normalize_cron("0 6 * * 1,3").unwrap(), ["0 0 6 * * 2,4"]);
}

#[test]
fn normalize_cron_passes_names_and_shorthands() {
    assert_eq!(normalize_cron("0 6 * * MON-FRI").unwrap(), ["0 0 6 * * MON-FRI"]);
    assert_eq!(normalize_cron("@daily").unwrap(), ["@daily"]);
}

#[test]
fn normalize_cron_expands_single_day_steps_to_saturday() {
    assert_eq!(normalize_cron("0 6 * * 1/2").unwrap(), ["0 0 6 * * 2,4,6"]);
    assert_eq!(normalize_cron("0 6 * * 5/1").unwrap(), ["0 0 6 * * 6,7"]);
    assert_eq!(normalize_cron("0 6 * * 0/3").unwrap(), ["0 0 6 * * 1,4,7"]);
}

#[test]
fn normalize_cron_splits_restricted_day_fields() {
    assert_eq!(
        normalize_cron("0 9 1 * 1").unwrap(),
        ["0 0 9 1 * *", "0 0 9 * * 2"]
    );
    assert_eq!(normalize_cron("0 9 1 * *").unwrap(), ["0 0 9 1 * *"]);
    assert_eq!(normalize_cron("0 9 */2 * 1").unwrap(), ["0 0 9 */2 * 2"]);
}

#[test]
fn normalize_cron_rejects_bad_shapes() {
    assert!(normalize_cron("0 9 * *").is_err());
    assert!(normalize_cron("0 0 9 * * *").is_err());
    assert!(normalize_cron("0 9 * * 8").is_err());
    assert!(normalize_cron("0 9 * * 5-2").is_err());
}

#[test]
fn parse_schedule_reports_reason() {
    let err = parse_schedule("61 9 * * *").unwrap_err();
    assert!(!err.reason().is_empty());
    assert!(parse_schedule("@daily").is_ok());
}

// -- schedule precedence -----------------------------------------------

#[test]
fn schedule_matches_only_its_minute() {
    let when = When {
        schedule: "0 9 14 * *".to_string(),
        ..When::default()
    };
    assert!(eligible(&when, &at(2024, 3, 14, 9, 0)));
    assert!(eligible(
        &when,
        &Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 45).unwrap().fixed_offset()
    ));
    assert!(!eligible(&when, &at(2024, 3, 14, 9, 1)));
    assert!(!eligible(&when, &at(2024, 3, 14, 8, 59)));
    assert!(!eligible(&when, &at(2024, 3, 15, 9, 0)));
}

#[test]
fn schedule_overrides_day_gates() {
    let mut when = when_days(&[1]);
    when.schedule = "0 9 14 * *".to_string();
    // Day gate says the 1st; the schedule wins.
    assert!(eligible(&when, &at(2024, 3, 14, 9, 0)));
    assert!(!eligible(&when, &at(2024, 3, 1, 9, 0)));
}

#[test]
fn schedule_weekday_uses_standard_numbering() {
    let monday = When {
        schedule: "0 9 * * 1".to_string(),
        ..When::default()
    };
    assert!(eligible(&monday, &at(2024, 3, 4, 9, 0)));
    assert!(!eligible(&monday, &at(2024, 3, 5, 9, 0)));

    for sunday in ["0 9 * * 0", "0 9 * * 7", "0 9 * * SUN"] {
        let when = When {
            schedule: sunday.to_string(),
            ..When::default()
        };
        assert!(eligible(&when, &at(2024, 3, 10, 9, 0)), "{sunday}");
        assert!(!eligible(&when, &at(2024, 3, 11, 9, 0)), "{sunday}");
    }
}

#[test]
fn schedule_weekday_step_starts_at_given_day() {
    let odd_days = When {
        schedule: "0 9 * * 1/2".to_string(),
        ..When::default()
    };
    // Mon 4th, Wed 6th, Fri 8th; never Sunday.
    for day in [4, 6, 8] {
        assert!(eligible(&odd_days, &at(2024, 3, day, 9, 0)), "march {day}");
    }
    for day in [3, 5, 7, 9, 10] {
        assert!(!eligible(&odd_days, &at(2024, 3, day, 9, 0)), "march {day}");
    }

    let friday_on = When {
        schedule: "0 9 * * 5/1".to_string(),
        ..When::default()
    };
    assert!(eligible(&friday_on, &at(2024, 3, 8, 9, 0)));
    assert!(eligible(&friday_on, &at(2024, 3, 9, 9, 0)));
    assert!(!eligible(&friday_on, &at(2024, 3, 10, 9, 0)));
}

#[test]
fn schedule_with_both_day_fields_matches_either() {
    let when = When {
        schedule: "0 9 1 * 1".to_string(),
        ..When::default()
    };
    // Monday the 4th, Friday the 1st, Tuesday the 5th.
    assert!(eligible(&when, &at(2024, 3, 4, 9, 0)));
    assert!(eligible(&when, &at(2024, 3, 1, 9, 0)));
    assert!(!eligible(&when, &at(2024, 3, 5, 9, 0)));
    assert!(!eligible(&when, &at(2024, 3, 4, 9, 1)));
}

#[test]
fn invalid_schedule_is_never_eligible() {
    let when = When {
        schedule: "not a cron".to_string(),
        ..When::default()
    };
    assert!(!eligible(&when, &at(2024, 3, 14, 9, 0)));
}

// -- day gates ---------------------------------------------------------

#[test]
fn no_gates_is_always_eligible() {
    assert!(eligible(&When::default(), &at(2024, 3, 14, 9, 0)));
}

#[test]
fn positive_day_of_month_matches_exact_day() {
    for d in 1..=31 {
        let when = when_days(&[d]);
        for day in 1..=31u32 {
            assert_eq!(
                eligible(&when, &at(2024, 1, day, 12, 0)),
                d as u32 == day,
                "day_of_month {d} on Jan {day}"
            );
        }
    }
    // February 2024 has 29 days; 30 and 31 never match.
    let when = when_days(&[30, 31]);
    for day in 1..=29 {
        assert!(!eligible(&when, &at(2024, 2, day, 12, 0)));
    }
}

#[test]
fn negative_day_of_month_counts_from_month_end() {
    let last = when_days(&[-1]);
    assert!(eligible(&last, &at(2024, 1, 31, 12, 0)));
    assert!(eligible(&last, &at(2024, 2, 29, 12, 0)));
    assert!(eligible(&last, &at(2023, 2, 28, 12, 0)));
    assert!(!eligible(&last, &at(2024, 2, 28, 12, 0)));

    for k in 1..=28 {
        let when = when_days(&[-k]);
        let expected = (30 - k + 1) as u32;
        assert!(eligible(&when, &at(2024, 4, expected, 12, 0)), "-{k} in April");
    }
}

#[test]
fn zero_day_of_month_never_matches() {
    assert!(!matches_day_of_month(&[0], &at(2024, 3, 1, 0, 0)));
}

#[test]
fn day_of_month_uses_local_calendar_day() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    // 23:30 UTC on the 14th is already the 15th at +02:00.
    let now = offset.with_ymd_and_hms(2024, 3, 15, 1, 30, 0).unwrap();
    assert!(eligible(&when_days(&[15]), &now));
    assert!(!eligible(&when_days(&[14]), &now));
}

#[test]
fn wrapping_range_spans_month_boundary() {
    let ranges = vec!["27-5".to_string()];
    for day in 1..=31u32 {
        let expected = day >= 27 || day <= 5;
        assert_eq!(matches_day_of_month_range(&ranges, &at(2024, 1, day, 0, 0)), expected);
    }
    for day in 1..=28u32 {
        let expected = day >= 27 || day <= 5;
        assert_eq!(matches_day_of_month_range(&ranges, &at(2023, 2, day, 0, 0)), expected);
    }
}

#[test]
fn plain_range_and_garbage() {
    let ranges = vec!["x-y".to_string(), " 10 - 12 ".to_string()];
    assert!(matches_day_of_month_range(&ranges, &at(2024, 3, 11, 0, 0)));
    assert!(!matches_day_of_month_range(&ranges, &at(2024, 3, 13, 0, 0)));
    assert_eq!(parse_range("junk"), None);
    assert_eq!(parse_range("3-"), None);
}

#[test]
fn days_of_week_accepts_abbreviations() {
    let when = When {
        days_of_week: vec!["Thurs".to_string(), "bogus".to_string()],
        ..When::default()
    };
    assert!(eligible(&when, &at(2024, 3, 14, 9, 0)));
    assert!(!eligible(&when, &at(2024, 3, 15, 9, 0)));
    assert_eq!(parse_weekday(" TUES "), Some(Weekday::Tue));
    assert_eq!(parse_weekday("funday"), None);
}

#[test]
fn gates_combine_with_and() {
    let when = When {
        day_of_month: vec![14, 15],
        days_of_week: vec!["fri".to_string()],
        ..When::default()
    };
    assert!(!eligible(&when, &at(2024, 3, 14, 9, 0)));
    assert!(eligible(&when, &at(2024, 3, 15, 9, 0)));
}

// -- nth weekday ---------------------------------------------------------

#[test]
fn first_monday_of_month() {
    let when = When {
        nth_weekday: "1 Monday".to_string(),
        ..When::default()
    };
    assert!(eligible(&when, &at(2024, 3, 4, 9, 0)));
    assert!(!eligible(&when, &at(2024, 3, 11, 9, 0)));
    assert!(!eligible(&when, &at(2024, 3, 5, 9, 0)));
}

#[test]
fn last_weekday_of_month() {
    let when = When {
        nth_weekday: "last fri".to_string(),
        ..When::default()
    };
    assert!(eligible(&when, &at(2024, 3, 29, 9, 0)));
    assert!(!eligible(&when, &at(2024, 3, 22, 9, 0)));
}

#[test]
fn fifth_weekday_absent_in_short_months() {
    let nth = NthWeekday::parse("5 thu").unwrap();
    assert!(nth.matches(&at(2024, 2, 29, 0, 0)));
    assert!(!(1..=28).any(|d| nth.matches(&at(2023, 2, d, 0, 0))));
}

#[test]
fn nth_weekday_parse_errors() {
    for bad in ["0 monday", "first monday", "1", "1 mon extra", "1 someday"] {
        assert_eq!(
            NthWeekday::parse(bad),
            Err(NthWeekdayError::InvalidNthWeekdaySyntax(bad.to_string()))
        );
        let when = When {
            nth_weekday: bad.to_string(),
            ..When::default()
        };
        assert!(!eligible(&when, &at(2024, 3, 4, 9, 0)));
    }
    assert_eq!(
        NthWeekday::parse("LAST Sun").unwrap().occurrence,
        Occurrence::Last
    );
}

// -- calendar ------------------------------------------------------------

#[test]
fn calendar_helpers() {
    assert_eq!(days_in_month(&at(2024, 2, 10, 0, 0)), 29);
    assert_eq!(days_in_month(&at(2023, 2, 10, 0, 0)), 28);
    assert_eq!(days_in_month(&at(2024, 12, 31, 0, 0)), 31);
    assert_eq!(start_of_day(&at(2024, 3, 14, 9, 42)), at(2024, 3, 14, 0, 0));
}
