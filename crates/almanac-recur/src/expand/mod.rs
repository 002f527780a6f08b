//! Expansion of recurrence rules into concrete occurrences.

mod calendar;
mod candidates;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};

use crate::error::{RecurError, RecurResult};
use crate::rule::{Frequency, RecurrenceRule};
use crate::validate::{check_rule, parse_record};
use crate::wire::RuleRecord;
use candidates::Candidates;

/// Default cap on the occurrences a single expansion may return.
pub const DEFAULT_MAX_OCCURRENCES: usize = 1000;

/// Inclusive range of calendar dates to expand into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// ## Summary
    /// Creates a window covering `start` through `end`, both inclusive.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> RecurResult<Self> {
        if start > end {
            return Err(RecurError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Options for recurrence expansion.
#[derive(Debug, Clone)]
pub struct ExpansionOptions {
    /// Maximum number of occurrences a single window may produce.
    pub max_occurrences: usize,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl ExpansionOptions {
    /// Sets the maximum number of occurrences.
    #[must_use]
    pub fn with_max_occurrences(mut self, max: usize) -> Self {
        self.max_occurrences = max;
        self
    }
}

/// One concrete instance of a recurring event.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<Tz: TimeZone> {
    /// 1-based position in the whole series; the anchor is 1.
    pub position: u32,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> Occurrence<Tz> {
    #[must_use]
    pub fn is_anchor(&self) -> bool {
        self.position == 1
    }
}

/// ## Summary
/// Expands a rule into the occurrences whose start date lies in `window`,
/// using the default [`ExpansionOptions`].
///
/// ## Errors
/// See [`expand_with_options`].
pub fn expand<Tz: TimeZone>(
    anchor_start: &DateTime<Tz>,
    anchor_end: &DateTime<Tz>,
    rule: &RecurrenceRule,
    window: DateWindow,
) -> RecurResult<Vec<Occurrence<Tz>>> {
    expand_with_options(
        anchor_start,
        anchor_end,
        rule,
        window,
        &ExpansionOptions::default(),
    )
}

/// ## Summary
/// Expands a rule into the occurrences whose start date lies in `window`.
///
/// The anchor is always occurrence 1, whether or not it matches the pattern.
/// Every later occurrence keeps the anchor's wall-clock time of day and its
/// duration. Dates and times are evaluated in the anchor's timezone; a time
/// skipped by a DST transition moves forward one hour, and a repeated one
/// takes its earlier instant.
///
/// `count` and `until` bound the whole series, independent of the window.
/// Periods that end before the window are counted without being generated,
/// so a window far from the anchor costs about as much as one near it.
///
/// ## Errors
///
/// Returns an error if:
/// - The rule breaks a structural invariant (`InvalidRule`)
/// - `anchor_end` is before `anchor_start` (`InvalidAnchor`)
/// - The window holds more than `max_occurrences` occurrences
/// - A generated local time cannot be represented in the timezone
///
/// ## Side Effects
///
/// None - this is a pure function that performs expansion in memory.
pub fn expand_with_options<Tz: TimeZone>(
    anchor_start: &DateTime<Tz>,
    anchor_end: &DateTime<Tz>,
    rule: &RecurrenceRule,
    window: DateWindow,
    options: &ExpansionOptions,
) -> RecurResult<Vec<Occurrence<Tz>>> {
    check_rule(rule).map_err(RecurError::InvalidRule)?;

    if anchor_end < anchor_start {
        return Err(RecurError::InvalidAnchor {
            start: anchor_start.naive_local().to_string(),
            end: anchor_end.naive_local().to_string(),
        });
    }

    let duration = anchor_end.clone().signed_duration_since(anchor_start.clone());
    let timezone = anchor_start.timezone();
    let anchor_local = anchor_start.naive_local();
    let time_of_day = anchor_local.time();
    let limit = rule
        .until()
        .map_or(window.end(), |until| until.min(window.end()));

    tracing::trace!(
        rule = %rule,
        anchor = %anchor_local,
        window_start = %window.start(),
        window_end = %window.end(),
        "Expanding recurrence"
    );

    let mut occurrences = Vec::new();

    let candidates = Candidates::starting_at(rule, anchor_local.date(), limit, window.start());
    for (position, date) in candidates {
        if let Some(count) = rule.count()
            && position > count.get()
        {
            break;
        }
        if date > limit {
            break;
        }
        if date < window.start() {
            continue;
        }

        if occurrences.len() >= options.max_occurrences {
            tracing::warn!(
                max = options.max_occurrences,
                "Recurrence expansion exceeded occurrence limit"
            );
            return Err(RecurError::TooManyOccurrences(options.max_occurrences));
        }

        let start = if position == 1 {
            anchor_start.clone()
        } else {
            resolve_local(&timezone, date.and_time(time_of_day))?
        };
        let end = start.clone() + duration;

        occurrences.push(Occurrence {
            position,
            start,
            end,
        });
    }

    tracing::trace!(count = occurrences.len(), "Expanded recurrence");

    Ok(occurrences)
}

/// ## Summary
/// Validates a wire rule and expands it.
///
/// ## Errors
/// Returns `UnsupportedFrequency` for a frequency other than DAILY, WEEKLY,
/// MONTHLY or YEARLY, `InvalidRule` for any other violation, and otherwise
/// the errors of [`expand_with_options`].
pub fn expand_record<Tz: TimeZone>(
    anchor_start: &DateTime<Tz>,
    anchor_end: &DateTime<Tz>,
    record: &RuleRecord,
    window: DateWindow,
    options: &ExpansionOptions,
) -> RecurResult<Vec<Occurrence<Tz>>> {
    if Frequency::parse(&record.frequency).is_none() {
        return Err(RecurError::UnsupportedFrequency(record.frequency.clone()));
    }
    let rule = parse_record(record).map_err(RecurError::InvalidRule)?;
    expand_with_options(anchor_start, anchor_end, &rule, window, options)
}

fn resolve_local<Tz: TimeZone>(timezone: &Tz, local: NaiveDateTime) -> RecurResult<DateTime<Tz>> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => local
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|shifted| timezone.from_local_datetime(&shifted).earliest())
            .ok_or(RecurError::UnresolvableLocalTime(local)),
    }
}
