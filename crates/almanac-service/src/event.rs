//! Calendar events and their validation.

use almanac_recur::{RecurrenceRule, RuleRecord, Violations, validate::parse_record};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Wire form of an event, as exchanged with clients and stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 instant.
    pub start_time: String,
    /// RFC 3339 instant.
    pub end_time: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_rule: Option<RuleRecord>,
}

/// A validated event. The event's start is the anchor of its recurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

fn parse_instant(
    value: &str,
    field: &'static str,
    violations: &mut Violations,
) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim())
        .inspect_err(|_| violations.push(field, "Enter a valid date and time"))
        .ok()
}

fn parse_event(record: &EventRecord) -> Result<Event, Violations> {
    let mut violations = Violations::default();

    if record.title.trim().is_empty() {
        violations.push("title", "Title is required");
    }

    let start = parse_instant(&record.start_time, "start_time", &mut violations);
    let end = parse_instant(&record.end_time, "end_time", &mut violations);
    if let (Some(start), Some(end)) = (start, end)
        && end <= start
    {
        violations.push("end_time", "End time must be after start time");
    }

    let recurrence = match (record.is_recurring, &record.recurrence_rule) {
        (true, None) => {
            violations.push(
                "recurrence_rule",
                "Recurrence rule is required for recurring events",
            );
            None
        }
        (false, Some(_)) => {
            violations.push(
                "recurrence_rule",
                "Recurrence rule should not be provided for non-recurring events",
            );
            None
        }
        (false, None) => None,
        (true, Some(rule)) => match parse_record(rule) {
            Ok(rule) => Some(rule),
            Err(rule_violations) => {
                violations.extend(rule_violations);
                None
            }
        },
    };

    let until = recurrence.as_ref().and_then(RecurrenceRule::until);
    if let (Some(start), Some(until)) = (start, until)
        && until < start.date_naive()
    {
        violations.push("until", "End date must not be before the event starts");
    }

    match (start, end) {
        (Some(start), Some(end)) if violations.is_empty() => Ok(Event {
            id: record.id,
            title: record.title.trim().to_string(),
            description: record.description.clone(),
            start,
            end,
            recurrence,
        }),
        _ => Err(violations),
    }
}

/// ## Summary
/// Checks an event record: a non-blank title, parseable start and end times
/// with the end after the start, and a valid recurrence rule exactly when the
/// event is recurring.
///
/// Rule violations keep the rule's own field names.
///
/// ## Errors
/// Returns every violation found.
pub fn validate_event(record: &EventRecord) -> Result<(), Violations> {
    parse_event(record).map(|_| ())
}

impl TryFrom<&EventRecord> for Event {
    type Error = ServiceError;

    fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
        parse_event(record).map_err(|violations| {
            tracing::warn!(event_id = record.id, %violations, "Rejected event record");
            ServiceError::ValidationError(violations)
        })
    }
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            start_time: event.start.to_rfc3339(),
            end_time: event.end.to_rfc3339(),
            is_recurring: event.is_recurring(),
            recurrence_rule: event.recurrence.as_ref().map(RuleRecord::from),
        }
    }
}
