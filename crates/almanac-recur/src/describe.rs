//! English descriptions of recurrence rules.

use chrono::{Month, Weekday};

use crate::rule::{
    Frequency, MonthlyPattern, Pattern, RecurrenceRule, WeekOfMonth, YearlyDay, weekday_name,
};
use crate::validate::parse_record;
use crate::wire::RuleRecord;

/// Returned for records that do not form a valid rule.
pub const CUSTOM_RECURRENCE: &str = "Custom recurrence";

/// ## Summary
/// Describes a rule, e.g. "Repeats every 2 weeks on Monday, Wednesday".
///
/// Covers frequency, interval and the day pattern. The rule's count or end
/// date is not mentioned.
#[must_use]
pub fn describe(rule: &RecurrenceRule) -> String {
    let mut text = repeats_every(rule.frequency(), rule.interval.get());

    match rule.pattern {
        Pattern::Daily => {}
        Pattern::Weekly { weekdays } => {
            if !weekdays.is_empty() {
                text.push_str(" on ");
                text.push_str(&weekdays.to_string());
            }
        }
        Pattern::Monthly(MonthlyPattern::Day(day)) => {
            text.push_str(&format!(" on day {}", day.get()));
        }
        Pattern::Monthly(MonthlyPattern::Ordinal { week, weekday }) => {
            text.push_str(&format!(" on the {}", ordinal(week, weekday)));
        }
        Pattern::Yearly { month, day } => text.push_str(&yearly_suffix(month, day)),
    }

    text
}

/// ## Summary
/// Describes a wire rule, falling back to [`CUSTOM_RECURRENCE`] for any
/// record that does not validate.
#[must_use]
pub fn describe_record(record: &RuleRecord) -> String {
    parse_record(record).map_or_else(|_| CUSTOM_RECURRENCE.to_string(), |rule| describe(&rule))
}

fn repeats_every(frequency: Frequency, interval: u32) -> String {
    if interval > 1 {
        format!("Repeats every {interval} {}s", frequency.unit())
    } else {
        format!("Repeats every {}", frequency.unit())
    }
}

fn ordinal(week: WeekOfMonth, weekday: Weekday) -> String {
    format!("{} {}", week.as_word(), weekday_name(weekday))
}

fn yearly_suffix(month: Month, day: YearlyDay) -> String {
    match day {
        YearlyDay::Anchor => format!(" in {}", month.name()),
        YearlyDay::Day(day) => format!(" on {} {}", month.name(), day.get()),
        YearlyDay::Ordinal { week, weekday } => {
            format!(" on the {} of {}", ordinal(week, weekday), month.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::rule::{MonthDay, WeekdaySet};

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).expect("non-zero")
    }

    #[test]
    fn daily() {
        assert_eq!(describe(&RecurrenceRule::daily()), "Repeats every day");
        assert_eq!(
            describe(&RecurrenceRule::daily().with_interval(nz(3))),
            "Repeats every 3 days"
        );
    }

    #[test]
    fn weekly_lists_days_monday_first() {
        let rule = RecurrenceRule::weekly(WeekdaySet::from_iter([
            Weekday::Wed,
            Weekday::Sun,
            Weekday::Mon,
        ]))
        .with_interval(nz(2));
        assert_eq!(
            describe(&rule),
            "Repeats every 2 weeks on Monday, Wednesday, Sunday"
        );
    }

    #[test]
    fn monthly() {
        let on_day = RecurrenceRule::monthly_on_day(MonthDay::new(15).expect("valid day"));
        assert_eq!(describe(&on_day), "Repeats every month on day 15");

        let last_friday = RecurrenceRule::monthly_on(WeekOfMonth::Last, Weekday::Fri);
        assert_eq!(
            describe(&last_friday),
            "Repeats every month on the last Friday"
        );

        let second_tuesday =
            RecurrenceRule::monthly_on(WeekOfMonth::Second, Weekday::Tue).with_interval(nz(3));
        assert_eq!(
            describe(&second_tuesday),
            "Repeats every 3 months on the second Tuesday"
        );
    }

    #[test]
    fn yearly() {
        assert_eq!(
            describe(&RecurrenceRule::yearly(Month::March, YearlyDay::Anchor)),
            "Repeats every year in March"
        );
        assert_eq!(
            describe(&RecurrenceRule::yearly(
                Month::March,
                YearlyDay::Day(MonthDay::new(15).expect("valid day"))
            )),
            "Repeats every year on March 15"
        );
        assert_eq!(
            describe(&RecurrenceRule::yearly(
                Month::May,
                YearlyDay::Ordinal {
                    week: WeekOfMonth::First,
                    weekday: Weekday::Mon
                }
            )),
            "Repeats every year on the first Monday of May"
        );
    }

    #[test]
    fn count_and_until_are_not_mentioned() {
        let rule = RecurrenceRule::daily().with_count(nz(4));
        assert_eq!(describe(&rule), "Repeats every day");
    }

    #[test]
    fn records_describe_like_rules() {
        let record = RuleRecord {
            frequency: "weekly".to_string(),
            interval: Some(1),
            weekdays: Some("4,0".to_string()),
            ..RuleRecord::default()
        };
        assert_eq!(
            describe_record(&record),
            "Repeats every week on Monday, Friday"
        );
    }

    #[test]
    fn malformed_records_fall_back() {
        let unknown = RuleRecord {
            frequency: "FORTNIGHTLY".to_string(),
            ..RuleRecord::default()
        };
        assert_eq!(describe_record(&unknown), CUSTOM_RECURRENCE);

        let broken = RuleRecord {
            frequency: "MONTHLY".to_string(),
            month_day: Some(10),
            week_of_month: Some(2),
            weekday_of_month: Some(1),
            ..RuleRecord::default()
        };
        assert_eq!(describe_record(&broken), CUSTOM_RECURRENCE);
    }
}
