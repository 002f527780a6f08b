//! Chronological generation of candidate dates for a rule.

use std::collections::VecDeque;

use chrono::{Datelike, Days, Month, Months, NaiveDate};

use super::calendar::{first_of_month, nth_weekday_of_month, week_start};
use crate::rule::{MonthlyPattern, Pattern, RecurrenceRule, YearlyDay};

/// Months and years in one full Gregorian cycle of 400 years.
const CYCLE_MONTHS: u32 = 4800;
const CYCLE_YEARS: u32 = 400;

/// Dates in one period, earliest first, plus the day the period begins.
struct Period {
    begins: NaiveDate,
    dates: Vec<NaiveDate>,
}

/// Yields the anchor date, then every date after it that matches the rule's
/// pattern, in chronological order, each with its 1-based position in the
/// series.
///
/// Periods are walked in steps of the rule's interval starting from the
/// anchor's own day, week, month or year. The walk stops at the first period
/// that begins after `limit`, so the iterator is always finite.
pub(crate) struct Candidates<'a> {
    rule: &'a RecurrenceRule,
    anchor: NaiveDate,
    limit: NaiveDate,
    next_period: u32,
    position: u32,
    pending: VecDeque<NaiveDate>,
    anchor_emitted: bool,
    exhausted: bool,
}

impl<'a> Candidates<'a> {
    pub(crate) fn new(rule: &'a RecurrenceRule, anchor: NaiveDate, limit: NaiveDate) -> Self {
        Self {
            rule,
            anchor,
            limit,
            next_period: 0,
            position: 0,
            pending: VecDeque::new(),
            anchor_emitted: false,
            exhausted: false,
        }
    }

    /// Like [`Candidates::new`], but begins at the last period that starts
    /// on or before `from`. Earlier periods are counted, not generated, so
    /// positions still match a walk from the anchor.
    pub(crate) fn starting_at(
        rule: &'a RecurrenceRule,
        anchor: NaiveDate,
        limit: NaiveDate,
        from: NaiveDate,
    ) -> Self {
        let mut candidates = Self::new(rule, anchor, limit);
        let Some(first) = period_on_or_before(rule, anchor, from).filter(|index| *index > 1)
        else {
            return candidates;
        };

        let in_anchor_period = period_at(&rule.pattern, anchor, 0).map_or(0, |period| {
            period.dates.iter().filter(|date| **date > anchor).count()
        });
        let skipped = 1 + saturate(in_anchor_period) + dates_in_periods(rule, anchor, first - 1);

        candidates.anchor_emitted = true;
        candidates.next_period = first;
        candidates.position = u32::try_from(skipped).unwrap_or(u32::MAX);
        candidates
    }

    fn fill_next_period(&mut self) {
        let period = self
            .next_period
            .checked_mul(self.rule.interval.get())
            .and_then(|offset| period_at(&self.rule.pattern, self.anchor, offset));

        let Some(period) = period else {
            self.exhausted = true;
            return;
        };

        if period.begins > self.limit {
            self.exhausted = true;
            return;
        }

        match self.next_period.checked_add(1) {
            Some(next) => self.next_period = next,
            None => self.exhausted = true,
        }

        self.pending.extend(
            period
                .dates
                .into_iter()
                .filter(|date| *date > self.anchor && *date <= self.limit),
        );
    }

    fn next_date(&mut self) -> Option<NaiveDate> {
        if !self.anchor_emitted {
            self.anchor_emitted = true;
            return Some(self.anchor);
        }

        loop {
            if let Some(date) = self.pending.pop_front() {
                return Some(date);
            }
            if self.exhausted {
                return None;
            }
            self.fill_next_period();
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = (u32, NaiveDate);

    fn next(&mut self) -> Option<(u32, NaiveDate)> {
        let date = self.next_date()?;
        self.position = self.position.saturating_add(1);
        Some((self.position, date))
    }
}

fn saturate(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// Index of the last period that begins on or before `from`, or `None` when
/// `from` precedes the anchor's period.
fn period_on_or_before(rule: &RecurrenceRule, anchor: NaiveDate, from: NaiveDate) -> Option<u32> {
    let units = match &rule.pattern {
        Pattern::Daily => from.signed_duration_since(anchor).num_days(),
        Pattern::Weekly { .. } => {
            week_start(from)?
                .signed_duration_since(week_start(anchor)?)
                .num_days()
                / 7
        }
        Pattern::Monthly(_) => {
            i64::from(from.year() - anchor.year()) * 12 + i64::from(from.month())
                - i64::from(anchor.month())
        }
        Pattern::Yearly { .. } => i64::from(from.year() - anchor.year()),
    };
    let interval = rule.interval.get();
    let mut index = u32::try_from(units / i64::from(interval)).ok()?;

    // A yearly period begins on the first of the rule's month, which can fall
    // after `from` in the same year.
    while index > 0
        && period_at(&rule.pattern, anchor, index.checked_mul(interval)?)?.begins > from
    {
        index -= 1;
    }
    Some(index)
}

/// Number of candidate dates in periods 1 through `last`.
fn dates_in_periods(rule: &RecurrenceRule, anchor: NaiveDate, last: u32) -> u64 {
    let interval = rule.interval.get();
    let cycle_units = match &rule.pattern {
        Pattern::Daily => return u64::from(last),
        Pattern::Weekly { weekdays } => return u64::from(last) * u64::from(weekdays.len()),
        Pattern::Monthly(_) => CYCLE_MONTHS,
        Pattern::Yearly { .. } => CYCLE_YEARS,
    };

    // Month lengths and weekdays repeat every 400 years, so whole cycles of
    // periods hold the same number of dates.
    let cycle = cycle_units / gcd(interval, cycle_units);
    let count_through = |end: u32| -> u64 {
        (1..=end)
            .filter_map(|index| {
                index
                    .checked_mul(interval)
                    .and_then(|offset| period_at(&rule.pattern, anchor, offset))
            })
            .map(|period| saturate(period.dates.len()))
            .sum()
    };

    u64::from(last / cycle) * count_through(cycle) + count_through(last % cycle)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The period `offset` days, weeks, months or years after the anchor's.
fn period_at(pattern: &Pattern, anchor: NaiveDate, offset: u32) -> Option<Period> {
    match pattern {
        Pattern::Daily => {
            let date = anchor.checked_add_days(Days::new(u64::from(offset)))?;
            Some(Period {
                begins: date,
                dates: vec![date],
            })
        }
        Pattern::Weekly { weekdays } => {
            let begins =
                week_start(anchor)?.checked_add_days(Days::new(u64::from(offset) * 7))?;
            let dates = weekdays
                .iter()
                .filter_map(|weekday| {
                    begins.checked_add_days(Days::new(u64::from(weekday.num_days_from_monday())))
                })
                .collect();
            Some(Period { begins, dates })
        }
        Pattern::Monthly(monthly) => {
            let begins = first_of_month(anchor).checked_add_months(Months::new(offset))?;
            let (year, month) = (begins.year(), begins.month());
            let date = match *monthly {
                MonthlyPattern::Day(day) => {
                    NaiveDate::from_ymd_opt(year, month, u32::from(day.get()))
                }
                MonthlyPattern::Ordinal { week, weekday } => {
                    nth_weekday_of_month(year, month, week, weekday)
                }
            };
            Some(Period {
                begins,
                dates: date.into_iter().collect(),
            })
        }
        Pattern::Yearly { month, day } => {
            let year = i32::try_from(offset)
                .ok()
                .and_then(|offset| anchor.year().checked_add(offset))?;
            yearly_period(year, *month, *day, anchor)
        }
    }
}

fn yearly_period(year: i32, month: Month, day: YearlyDay, anchor: NaiveDate) -> Option<Period> {
    let month = month.number_from_month();
    let begins = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = match day {
        YearlyDay::Anchor => NaiveDate::from_ymd_opt(year, month, anchor.day()),
        YearlyDay::Day(day) => NaiveDate::from_ymd_opt(year, month, u32::from(day.get())),
        YearlyDay::Ordinal { week, weekday } => nth_weekday_of_month(year, month, week, weekday),
    };
    Some(Period {
        begins,
        dates: date.into_iter().collect(),
    })
}
