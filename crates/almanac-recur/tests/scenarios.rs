//! End-to-end expansion of wire rules.

use almanac_recur::{
    DateWindow, ExpansionOptions, Occurrence, RecurError, RuleRecord, describe_record,
    expand_record, validate,
};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc, Weekday};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid datetime")
}

fn record(frequency: &str) -> RuleRecord {
    RuleRecord {
        frequency: frequency.to_string(),
        interval: Some(1),
        ..RuleRecord::default()
    }
}

fn expand_in(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rule: &RuleRecord,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Occurrence<Utc>> {
    let window = DateWindow::new(from, to).expect("valid window");
    expand_record(&start, &end, rule, window, &ExpansionOptions::default())
        .expect("expansion succeeds")
}

fn start_dates(occurrences: &[Occurrence<Utc>]) -> Vec<NaiveDate> {
    occurrences.iter().map(|o| o.start.date_naive()).collect()
}

#[test_log::test]
fn every_other_day() {
    let rule = RuleRecord {
        interval: Some(2),
        ..record("DAILY")
    };
    let occurrences = expand_in(
        utc(2024, 1, 1, 9),
        utc(2024, 1, 1, 10),
        &rule,
        date(2024, 1, 1),
        date(2024, 1, 10),
    );

    assert_eq!(
        start_dates(&occurrences),
        vec![
            date(2024, 1, 1),
            date(2024, 1, 3),
            date(2024, 1, 5),
            date(2024, 1, 7),
            date(2024, 1, 9)
        ]
    );
    for occurrence in &occurrences {
        assert_eq!(occurrence.start.hour(), 9);
        assert_eq!(occurrence.end.hour(), 10);
    }
}

#[test_log::test]
fn monday_and_wednesday_for_two_weeks() {
    let rule = RuleRecord {
        weekdays: Some("0,2".to_string()),
        ..record("WEEKLY")
    };
    // 2024-01-01 is a Monday.
    let occurrences = expand_in(
        utc(2024, 1, 1, 18),
        utc(2024, 1, 1, 19),
        &rule,
        date(2024, 1, 1),
        date(2024, 1, 14),
    );

    let weekdays: Vec<_> = occurrences.iter().map(|o| o.start.weekday()).collect();
    assert_eq!(
        weekdays,
        vec![Weekday::Mon, Weekday::Wed, Weekday::Mon, Weekday::Wed]
    );
}

#[test_log::test]
fn day_31_only_in_long_months() {
    let rule = RuleRecord {
        month_day: Some(31),
        ..record("MONTHLY")
    };
    let occurrences = expand_in(
        utc(2024, 1, 31, 12),
        utc(2024, 1, 31, 13),
        &rule,
        date(2024, 1, 1),
        date(2024, 4, 30),
    );

    assert_eq!(
        start_dates(&occurrences),
        vec![date(2024, 1, 31), date(2024, 3, 31)]
    );
}

#[test_log::test]
fn last_friday_of_one_month() {
    let rule = RuleRecord {
        week_of_month: Some(-1),
        weekday_of_month: Some(4),
        ..record("MONTHLY")
    };
    let occurrences = expand_in(
        utc(2024, 1, 26, 16),
        utc(2024, 1, 26, 17),
        &rule,
        date(2024, 5, 1),
        date(2024, 5, 31),
    );

    assert_eq!(start_dates(&occurrences), vec![date(2024, 5, 31)]);
    assert_eq!(occurrences[0].position, 5);
}

#[test_log::test]
fn count_with_until_is_rejected() {
    let rule = RuleRecord {
        count: Some(5),
        until: Some("2024-12-31".to_string()),
        ..record("DAILY")
    };

    let violations = validate(&rule).expect_err("count and until conflict");
    assert!(violations.has_field("until"));

    let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).expect("valid window");
    let result = expand_record(
        &utc(2024, 1, 1, 9),
        &utc(2024, 1, 1, 10),
        &rule,
        window,
        &ExpansionOptions::default(),
    );
    assert!(matches!(result, Err(RecurError::InvalidRule(_))));
}

#[test_log::test]
fn unknown_frequency_is_unsupported() {
    let window = DateWindow::single_day(date(2024, 1, 1));
    let result = expand_record(
        &utc(2024, 1, 1, 9),
        &utc(2024, 1, 1, 10),
        &record("HOURLY"),
        window,
        &ExpansionOptions::default(),
    );
    assert!(matches!(result, Err(RecurError::UnsupportedFrequency(f)) if f == "HOURLY"));
    assert_eq!(describe_record(&record("HOURLY")), "Custom recurrence");
}

#[test_log::test]
fn occurrences_are_ordered_and_keep_their_shape() {
    let rules = [
        RuleRecord {
            interval: Some(3),
            ..record("DAILY")
        },
        RuleRecord {
            weekdays: Some("6,1,3".to_string()),
            interval: Some(2),
            ..record("WEEKLY")
        },
        RuleRecord {
            week_of_month: Some(2),
            weekday_of_month: Some(1),
            ..record("MONTHLY")
        },
        RuleRecord {
            month: Some(2),
            month_day: Some(29),
            ..record("YEARLY")
        },
    ];
    let start = Utc
        .with_ymd_and_hms(2024, 2, 13, 7, 45, 0)
        .single()
        .expect("valid datetime");
    let end = Utc
        .with_ymd_and_hms(2024, 2, 13, 9, 15, 0)
        .single()
        .expect("valid datetime");

    for rule in &rules {
        let occurrences = expand_in(start, end, rule, date(2024, 1, 1), date(2028, 12, 31));
        assert!(!occurrences.is_empty(), "{rule:?} produced nothing");

        for pair in occurrences.windows(2) {
            assert!(pair[0].start < pair[1].start, "{rule:?} is out of order");
            assert_eq!(pair[0].position + 1, pair[1].position);
        }
        for occurrence in &occurrences {
            assert_eq!(occurrence.end - occurrence.start, end - start);
            assert_eq!(occurrence.start.time(), start.time());
        }
    }
}

#[test_log::test]
fn count_applies_to_the_whole_series() {
    let rule = RuleRecord {
        count: Some(10),
        weekdays: Some("0".to_string()),
        ..record("WEEKLY")
    };
    let start = utc(2024, 1, 1, 9);
    let end = utc(2024, 1, 1, 10);

    let all = expand_in(start, end, &rule, date(2024, 1, 1), date(2024, 12, 31));
    assert_eq!(all.len(), 10);

    let tail = expand_in(start, end, &rule, date(2024, 2, 1), date(2024, 12, 31));
    assert_eq!(
        start_dates(&tail),
        vec![
            date(2024, 2, 5),
            date(2024, 2, 12),
            date(2024, 2, 19),
            date(2024, 2, 26),
            date(2024, 3, 4)
        ]
    );
    assert_eq!(tail.first().map(|o| o.position), Some(6));
}

