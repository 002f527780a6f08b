//! Recurrence rules for calendar events.
//!
//! A [`RecurrenceRule`] describes how an anchor event repeats. The crate can
//! validate the loosely-typed wire form of a rule ([`RuleRecord`]), expand a
//! rule into concrete occurrences inside a date window, describe it as an
//! English sentence, and render it as RFC 5545 RRULE text.
//!
//! Weekdays are numbered Monday = 0 through Sunday = 6 everywhere, and weeks
//! start on Monday.

pub mod describe;
pub mod error;
pub mod expand;
pub mod ical;
pub mod rule;
pub mod validate;
pub mod wire;

pub use describe::{describe, describe_record};
pub use error::{RecurError, RecurResult};
pub use expand::{DateWindow, ExpansionOptions, Occurrence, expand, expand_record, expand_with_options};
pub use rule::{
    Frequency, MonthDay, MonthlyPattern, Pattern, RecurrenceEnd, RecurrenceRule, WeekOfMonth,
    WeekdaySet, YearlyDay,
};
pub use validate::{FieldViolation, Violations, validate};
pub use wire::RuleRecord;
