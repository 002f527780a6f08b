//! Typed recurrence rules.
//!
//! Each frequency carries only the fields that mean something for it, so a
//! rule with both a count and an end date, or a monthly rule with both a day
//! and a weekday pattern, cannot be constructed.

mod frequency;
mod weekday;

use std::num::NonZeroU32;

use chrono::{Month, NaiveDate, Weekday};

pub use frequency::Frequency;
pub use weekday::{
    WeekOfMonth, WeekdaySet, weekday_code, weekday_from_index, weekday_index, weekday_name,
};

/// Day of the month, 1 through 31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay(u8);

impl MonthDay {
    #[must_use]
    pub const fn new(day: u8) -> Option<Self> {
        if day >= 1 && day <= 31 {
            Some(Self(day))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Which day a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthlyPattern {
    /// The given day of every month; months without that day are skipped.
    Day(MonthDay),
    /// The n-th (or last) given weekday of every month.
    Ordinal { week: WeekOfMonth, weekday: Weekday },
}

/// Which day in the chosen month a yearly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearlyDay {
    /// The anchor's own day of the month.
    Anchor,
    Day(MonthDay),
    Ordinal { week: WeekOfMonth, weekday: Weekday },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Daily,
    Weekly { weekdays: WeekdaySet },
    Monthly(MonthlyPattern),
    Yearly { month: Month, day: YearlyDay },
}

impl Pattern {
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly { .. } => Frequency::Weekly,
            Self::Monthly(_) => Frequency::Monthly,
            Self::Yearly { .. } => Frequency::Yearly,
        }
    }
}

/// When a rule stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecurrenceEnd {
    #[default]
    Never,
    /// Total number of occurrences, the anchor included.
    Count(NonZeroU32),
    /// Last date (inclusive) on which an occurrence may fall.
    Until(NaiveDate),
}

/// A repeat pattern for an anchor event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    pub pattern: Pattern,
    /// Step between successive periods (every `interval` days, weeks, ...).
    pub interval: NonZeroU32,
    pub end: RecurrenceEnd,
}

impl RecurrenceRule {
    /// Creates an unbounded rule repeating every period.
    #[must_use]
    pub const fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            interval: NonZeroU32::MIN,
            end: RecurrenceEnd::Never,
        }
    }

    #[must_use]
    pub const fn daily() -> Self {
        Self::new(Pattern::Daily)
    }

    #[must_use]
    pub const fn weekly(weekdays: WeekdaySet) -> Self {
        Self::new(Pattern::Weekly { weekdays })
    }

    #[must_use]
    pub const fn monthly_on_day(day: MonthDay) -> Self {
        Self::new(Pattern::Monthly(MonthlyPattern::Day(day)))
    }

    #[must_use]
    pub const fn monthly_on(week: WeekOfMonth, weekday: Weekday) -> Self {
        Self::new(Pattern::Monthly(MonthlyPattern::Ordinal { week, weekday }))
    }

    #[must_use]
    pub const fn yearly(month: Month, day: YearlyDay) -> Self {
        Self::new(Pattern::Yearly { month, day })
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: NonZeroU32) -> Self {
        self.interval = interval;
        self
    }

    /// Limits the rule to `count` occurrences, replacing any end date.
    #[must_use]
    pub const fn with_count(mut self, count: NonZeroU32) -> Self {
        self.end = RecurrenceEnd::Count(count);
        self
    }

    /// Ends the rule on `until` (inclusive), replacing any count.
    #[must_use]
    pub const fn with_until(mut self, until: NaiveDate) -> Self {
        self.end = RecurrenceEnd::Until(until);
        self
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.pattern.frequency()
    }

    #[must_use]
    pub const fn count(&self) -> Option<NonZeroU32> {
        match self.end {
            RecurrenceEnd::Count(count) => Some(count),
            _ => None,
        }
    }

    #[must_use]
    pub const fn until(&self) -> Option<NaiveDate> {
        match self.end {
            RecurrenceEnd::Until(until) => Some(until),
            _ => None,
        }
    }
}

/// Longest length a month can have, counting February as 29 days.
#[must_use]
pub const fn max_days_in_month(month: Month) -> u8 {
    match month {
        Month::February => 29,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}
