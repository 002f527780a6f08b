//! Expansion checked against the `rrule` crate.
//!
//! Every case anchors on a date that matches its own pattern and is bounded
//! by COUNT, which is where both engines must agree exactly.

use std::num::NonZeroU32;

use almanac_recur::{
    DateWindow, MonthDay, RecurrenceRule, WeekOfMonth, WeekdaySet, YearlyDay, expand,
};
use chrono::{DateTime, Month, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use rrule::RRuleSet;

struct ConformanceCase {
    name: &'static str,
    dtstart: &'static str,
    rule: RecurrenceRule,
}

fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("non-zero")
}

fn day(n: u8) -> MonthDay {
    MonthDay::new(n).expect("valid day")
}

fn cases() -> Vec<ConformanceCase> {
    vec![
        ConformanceCase {
            name: "daily_every_other_day",
            dtstart: "20240101T090000Z",
            rule: RecurrenceRule::daily()
                .with_interval(nz(2))
                .with_count(nz(10)),
        },
        ConformanceCase {
            name: "weekly_mwf_biweekly",
            dtstart: "20240101T180000Z",
            rule: RecurrenceRule::weekly(WeekdaySet::from_iter([
                Weekday::Mon,
                Weekday::Wed,
                Weekday::Fri,
            ]))
            .with_interval(nz(2))
            .with_count(nz(12)),
        },
        ConformanceCase {
            name: "weekly_weekend",
            dtstart: "20240106T100000Z",
            rule: RecurrenceRule::weekly(WeekdaySet::from_iter([Weekday::Sat, Weekday::Sun]))
                .with_count(nz(8)),
        },
        ConformanceCase {
            name: "monthly_day_31",
            dtstart: "20240131T120000Z",
            rule: RecurrenceRule::monthly_on_day(day(31)).with_count(nz(6)),
        },
        ConformanceCase {
            name: "monthly_last_friday",
            dtstart: "20240126T160000Z",
            rule: RecurrenceRule::monthly_on(WeekOfMonth::Last, Weekday::Fri).with_count(nz(6)),
        },
        ConformanceCase {
            name: "monthly_second_tuesday_quarterly",
            dtstart: "20240109T080000Z",
            rule: RecurrenceRule::monthly_on(WeekOfMonth::Second, Weekday::Tue)
                .with_interval(nz(3))
                .with_count(nz(5)),
        },
        ConformanceCase {
            name: "yearly_thanksgiving",
            dtstart: "20231123T150000Z",
            rule: RecurrenceRule::yearly(
                Month::November,
                YearlyDay::Ordinal {
                    week: WeekOfMonth::Fourth,
                    weekday: Weekday::Thu,
                },
            )
            .with_count(nz(4)),
        },
        ConformanceCase {
            name: "yearly_leap_day",
            dtstart: "20240229T090000Z",
            rule: RecurrenceRule::yearly(Month::February, YearlyDay::Day(day(29)))
                .with_count(nz(3)),
        },
        ConformanceCase {
            name: "yearly_anchor_day",
            dtstart: "20240704T120000Z",
            rule: RecurrenceRule::yearly(Month::July, YearlyDay::Anchor).with_count(nz(3)),
        },
    ]
}

fn reference_dates(case: &ConformanceCase) -> Vec<DateTime<Utc>> {
    let text = format!("DTSTART:{}\nRRULE:{}", case.dtstart, case.rule);
    let rrule_set: RRuleSet = text
        .parse()
        .unwrap_or_else(|e| panic!("{}: rrule rejected {text:?}: {e}", case.name));
    rrule_set
        .all(100)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc))
        .collect()
}

fn expanded_dates(case: &ConformanceCase) -> Vec<DateTime<Utc>> {
    let anchor = NaiveDateTime::parse_from_str(case.dtstart, "%Y%m%dT%H%M%SZ")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .expect("valid dtstart");
    let window = DateWindow::new(
        anchor.date_naive(),
        NaiveDate::from_ymd_opt(2040, 12, 31).expect("valid date"),
    )
    .expect("valid window");

    expand(&anchor, &anchor, &case.rule, window)
        .unwrap_or_else(|e| panic!("{}: expansion failed: {e}", case.name))
        .into_iter()
        .map(|occurrence| occurrence.start)
        .collect()
}

#[test_log::test]
fn expansion_matches_rrule() {
    for case in cases() {
        assert_eq!(
            expanded_dates(&case),
            reference_dates(&case),
            "{} ({})",
            case.name,
            case.rule
        );
    }
}
