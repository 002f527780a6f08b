//! iCalendar RRULE text for recurrence rules (RFC 5545 §3.3.10).
//!
//! Weeks start on Monday, which is also the RFC 5545 default, so `WKST` is
//! never written.

use std::fmt;

use chrono::Weekday;

use crate::rule::{
    MonthlyPattern, Pattern, RecurrenceEnd, RecurrenceRule, WeekOfMonth, YearlyDay, weekday_code,
};

fn by_day(week: WeekOfMonth, weekday: Weekday) -> String {
    format!("BYDAY={}{}", week.to_wire(), weekday_code(weekday))
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("FREQ={}", self.frequency())];

        if self.interval.get() != 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }

        match self.end {
            RecurrenceEnd::Never => {}
            RecurrenceEnd::Count(count) => parts.push(format!("COUNT={count}")),
            RecurrenceEnd::Until(until) => parts.push(format!("UNTIL={}", until.format("%Y%m%d"))),
        }

        match self.pattern {
            Pattern::Daily => {}
            Pattern::Weekly { weekdays } => {
                let codes: Vec<_> = weekdays.iter().map(weekday_code).collect();
                parts.push(format!("BYDAY={}", codes.join(",")));
            }
            Pattern::Monthly(MonthlyPattern::Day(day)) => {
                parts.push(format!("BYMONTHDAY={}", day.get()));
            }
            Pattern::Monthly(MonthlyPattern::Ordinal { week, weekday }) => {
                parts.push(by_day(week, weekday));
            }
            Pattern::Yearly { month, day } => {
                parts.push(format!("BYMONTH={}", month.number_from_month()));
                match day {
                    YearlyDay::Anchor => {}
                    YearlyDay::Day(day) => parts.push(format!("BYMONTHDAY={}", day.get())),
                    YearlyDay::Ordinal { week, weekday } => parts.push(by_day(week, weekday)),
                }
            }
        }

        write!(f, "{}", parts.join(";"))
    }
}
