//! The loosely-typed rule shape exchanged with the events API.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::rule::{
    MonthlyPattern, Pattern, RecurrenceEnd, RecurrenceRule, WeekOfMonth, YearlyDay,
    weekday_index,
};
use crate::validate::{Violations, parse_record};

/// Wire form of a recurrence rule. Every field but `frequency` is nullable,
/// and integers are kept wide so out-of-range input reaches the validator
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleRecord {
    pub frequency: String,
    #[serde(default)]
    pub interval: Option<i64>,
    /// Comma-separated Monday = 0 weekday indices.
    #[serde(default)]
    pub weekdays: Option<String>,
    #[serde(default)]
    pub month_day: Option<i64>,
    #[serde(default)]
    pub month: Option<i64>,
    #[serde(default)]
    pub week_of_month: Option<i64>,
    #[serde(default)]
    pub weekday_of_month: Option<i64>,
    #[serde(default)]
    pub count: Option<i64>,
    /// `YYYY-MM-DD`, or an RFC 3339 date-time whose own calendar date is used.
    #[serde(default)]
    pub until: Option<String>,
}

/// Parses the `until` wire value.
#[must_use]
pub fn parse_until(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

impl TryFrom<&RuleRecord> for RecurrenceRule {
    type Error = Violations;

    fn try_from(record: &RuleRecord) -> Result<Self, Self::Error> {
        parse_record(record)
    }
}

impl From<&RecurrenceRule> for RuleRecord {
    fn from(rule: &RecurrenceRule) -> Self {
        let mut record = Self {
            frequency: rule.frequency().as_str().to_string(),
            interval: Some(i64::from(rule.interval.get())),
            ..Self::default()
        };

        match rule.end {
            RecurrenceEnd::Never => {}
            RecurrenceEnd::Count(count) => record.count = Some(i64::from(count.get())),
            RecurrenceEnd::Until(until) => {
                record.until = Some(until.format("%Y-%m-%d").to_string());
            }
        }

        let ordinal = |record: &mut Self, week: WeekOfMonth, weekday| {
            record.week_of_month = Some(i64::from(week.to_wire()));
            record.weekday_of_month = Some(i64::from(weekday_index(weekday)));
        };

        match rule.pattern {
            Pattern::Daily => {}
            Pattern::Weekly { weekdays } => record.weekdays = Some(weekdays.to_wire()),
            Pattern::Monthly(MonthlyPattern::Day(day)) => {
                record.month_day = Some(i64::from(day.get()));
            }
            Pattern::Monthly(MonthlyPattern::Ordinal { week, weekday }) => {
                ordinal(&mut record, week, weekday);
            }
            Pattern::Yearly { month, day } => {
                record.month = Some(i64::from(month.number_from_month()));
                match day {
                    YearlyDay::Anchor => {}
                    YearlyDay::Day(day) => record.month_day = Some(i64::from(day.get())),
                    YearlyDay::Ordinal { week, weekday } => ordinal(&mut record, week, weekday),
                }
            }
        }

        record
    }
}

impl From<RecurrenceRule> for RuleRecord {
    fn from(rule: RecurrenceRule) -> Self {
        Self::from(&rule)
    }
}
