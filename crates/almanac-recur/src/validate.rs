//! ## Summary
//! Field-level validation of wire recurrence rules.
//!
//! Validation and conversion are the same pass: [`parse_record`] builds the
//! typed rule while collecting every violation it meets, so a record that
//! validates always converts and vice versa.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{Month, Weekday};
use serde::Serialize;

use crate::rule::{
    Frequency, MonthDay, MonthlyPattern, Pattern, RecurrenceEnd, RecurrenceRule, WeekOfMonth,
    WeekdaySet, YearlyDay, max_days_in_month, weekday_from_index,
};
use crate::wire::{RuleRecord, parse_until};

/// Order in which violations are reported.
const FIELD_ORDER: &[&str] = &[
    "frequency",
    "interval",
    "count",
    "until",
    "weekdays",
    "month_day",
    "month",
    "week_of_month",
    "weekday_of_month",
    "month_pattern",
];

/// A problem with one field of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every violation found in a rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldViolation> {
        self.0.iter()
    }

    /// Returns the message for a field, if it has a violation.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|violation| violation.field == field)
            .map(|violation| violation.message.as_str())
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }

    fn sorted(mut self) -> Self {
        let rank = |field: &str| {
            FIELD_ORDER
                .iter()
                .position(|known| *known == field)
                .unwrap_or(FIELD_ORDER.len())
        };
        self.0.sort_by_key(|violation| rank(violation.field));
        self
    }

    fn into_result<T>(self, value: Option<T>) -> Result<T, Self> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self.sorted()),
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self
            .0
            .iter()
            .map(|violation| format!("{}: {}", violation.field, violation.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// ## Summary
/// Checks a wire rule against every structural invariant.
///
/// Fields that mean nothing for the rule's frequency are ignored.
///
/// ## Errors
/// Returns all violations found, ordered by field.
pub fn validate(record: &RuleRecord) -> Result<(), Violations> {
    parse_record(record).map(|_| ())
}

/// ## Summary
/// Checks invariants a typed rule can still break: an empty weekday set, or a
/// yearly day that no year has.
///
/// ## Errors
/// Returns the violations found.
pub fn check_rule(rule: &RecurrenceRule) -> Result<(), Violations> {
    let mut violations = Violations::default();
    match rule.pattern {
        Pattern::Weekly { weekdays } if weekdays.is_empty() => {
            violations.push("weekdays", "Select at least one day of the week");
        }
        Pattern::Yearly {
            month,
            day: YearlyDay::Day(day),
        } => check_day_exists(month, day, &mut violations),
        _ => {}
    }
    violations.into_result(Some(()))
}

/// ## Summary
/// Converts a wire rule into a typed rule, collecting every violation.
///
/// ## Errors
/// Returns all violations found, ordered by field.
pub fn parse_record(record: &RuleRecord) -> Result<RecurrenceRule, Violations> {
    let mut violations = Violations::default();

    let frequency = Frequency::parse(&record.frequency);
    if frequency.is_none() {
        violations.push(
            "frequency",
            format!(
                "Unsupported frequency '{}'; expected DAILY, WEEKLY, MONTHLY or YEARLY",
                record.frequency
            ),
        );
    }

    let interval = match record.interval {
        None => Some(NonZeroU32::MIN),
        Some(value) => positive(value).or_else(|| {
            violations.push("interval", "Interval must be at least 1");
            None
        }),
    };

    let end = parse_end(record, &mut violations);

    let pattern = frequency.and_then(|frequency| match frequency {
        Frequency::Daily => Some(Pattern::Daily),
        Frequency::Weekly => parse_weekly(record, &mut violations),
        Frequency::Monthly => parse_monthly(record, &mut violations),
        Frequency::Yearly => parse_yearly(record, &mut violations),
    });

    let rule = match (pattern, interval, end) {
        (Some(pattern), Some(interval), Some(end)) => Some(RecurrenceRule {
            pattern,
            interval,
            end,
        }),
        _ => None,
    };

    violations.into_result(rule)
}

fn positive(value: i64) -> Option<NonZeroU32> {
    u32::try_from(value).ok().and_then(NonZeroU32::new)
}

fn parse_end(record: &RuleRecord, violations: &mut Violations) -> Option<RecurrenceEnd> {
    let count = match record.count {
        None => None,
        Some(value) => {
            let count = positive(value);
            if count.is_none() {
                violations.push("count", "Count must be at least 1");
            }
            Some(count)
        }
    };

    let until = record.until.as_deref().map(|value| {
        let until = parse_until(value);
        if until.is_none() {
            violations.push(
                "until",
                format!("Invalid end date '{value}'; expected YYYY-MM-DD or an RFC 3339 date-time"),
            );
        }
        until
    });

    match (count, until) {
        (Some(_), Some(_)) => {
            violations.push(
                "until",
                "Set either an occurrence count or an end date, not both",
            );
            None
        }
        (Some(count), None) => count.map(RecurrenceEnd::Count),
        (None, Some(until)) => until.map(RecurrenceEnd::Until),
        (None, None) => Some(RecurrenceEnd::Never),
    }
}

fn parse_weekly(record: &RuleRecord, violations: &mut Violations) -> Option<Pattern> {
    let Some(raw) = record.weekdays.as_deref() else {
        violations.push("weekdays", "Select at least one day of the week");
        return None;
    };

    match WeekdaySet::parse_wire(raw) {
        Ok(weekdays) if weekdays.is_empty() => {
            violations.push("weekdays", "Select at least one day of the week");
            None
        }
        Ok(weekdays) => Some(Pattern::Weekly { weekdays }),
        Err(token) => {
            violations.push(
                "weekdays",
                format!("Invalid weekday '{token}'; expected 0 (Monday) to 6 (Sunday)"),
            );
            None
        }
    }
}

/// Result of reading one optional wire field.
enum Field<T> {
    Absent,
    Valid(T),
    Invalid,
}

fn parse_month_day(record: &RuleRecord, violations: &mut Violations) -> Field<MonthDay> {
    match record.month_day {
        None => Field::Absent,
        Some(value) => match u8::try_from(value).ok().and_then(MonthDay::new) {
            Some(day) => Field::Valid(day),
            None => {
                violations.push("month_day", "Day of month must be between 1 and 31");
                Field::Invalid
            }
        },
    }
}

fn parse_ordinal(
    record: &RuleRecord,
    violations: &mut Violations,
) -> Field<(WeekOfMonth, Weekday)> {
    let week = record.week_of_month.map(|value| {
        let week = WeekOfMonth::from_wire(value);
        if week.is_none() {
            violations.push(
                "week_of_month",
                "Week of month must be 1, 2, 3, 4 or -1 (last)",
            );
        }
        week
    });
    let weekday = record.weekday_of_month.map(|value| {
        let weekday = u8::try_from(value).ok().and_then(weekday_from_index);
        if weekday.is_none() {
            violations.push(
                "weekday_of_month",
                "Weekday must be between 0 (Monday) and 6 (Sunday)",
            );
        }
        weekday
    });

    match (week, weekday) {
        (None, None) => Field::Absent,
        (Some(Some(week)), Some(Some(weekday))) => Field::Valid((week, weekday)),
        (Some(_), None) => {
            violations.push(
                "week_of_month",
                "Week of month needs a weekday of the month",
            );
            Field::Invalid
        }
        (None, Some(_)) => {
            violations.push(
                "weekday_of_month",
                "Weekday of month needs a week of the month",
            );
            Field::Invalid
        }
        _ => Field::Invalid,
    }
}

fn parse_monthly(record: &RuleRecord, violations: &mut Violations) -> Option<Pattern> {
    let day = parse_month_day(record, violations);
    let ordinal = parse_ordinal(record, violations);

    match (day, ordinal) {
        (Field::Absent, Field::Absent) => {
            violations.push(
                "month_pattern",
                "Select a monthly pattern: a day of the month or a weekday of the month",
            );
            None
        }
        (Field::Absent, Field::Valid((week, weekday))) => {
            Some(Pattern::Monthly(MonthlyPattern::Ordinal { week, weekday }))
        }
        (Field::Valid(day), Field::Absent) => Some(Pattern::Monthly(MonthlyPattern::Day(day))),
        (Field::Absent | Field::Invalid, _) | (_, Field::Absent | Field::Invalid) => None,
        (Field::Valid(_), Field::Valid(_)) => {
            violations.push(
                "month_pattern",
                "Choose either a day of the month or a weekday of the month, not both",
            );
            None
        }
    }
}

fn parse_yearly(record: &RuleRecord, violations: &mut Violations) -> Option<Pattern> {
    let month = match record.month {
        None => {
            violations.push("month", "Select a month");
            None
        }
        Some(value) => {
            let month = u8::try_from(value)
                .ok()
                .and_then(|number| Month::try_from(number).ok());
            if month.is_none() {
                violations.push("month", "Month must be between 1 and 12");
            }
            month
        }
    };

    let day = match (parse_month_day(record, violations), parse_ordinal(record, violations)) {
        (Field::Absent, Field::Absent) => Some(YearlyDay::Anchor),
        (Field::Valid(day), Field::Absent) => Some(YearlyDay::Day(day)),
        (Field::Absent, Field::Valid((week, weekday))) => {
            Some(YearlyDay::Ordinal { week, weekday })
        }
        (Field::Valid(_), Field::Valid(_)) => {
            violations.push(
                "month_pattern",
                "Choose either a day of the month or a weekday of the month, not both",
            );
            None
        }
        _ => None,
    };

    if let (Some(month), Some(YearlyDay::Day(day))) = (month, day) {
        check_day_exists(month, day, violations);
    }

    Some(Pattern::Yearly {
        month: month?,
        day: day?,
    })
}

fn check_day_exists(month: Month, day: MonthDay, violations: &mut Violations) {
    if day.get() > max_days_in_month(month) {
        violations.push(
            "month_day",
            format!("{} never has a day {}", month.name(), day.get()),
        );
    }
}
