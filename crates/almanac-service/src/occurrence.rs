//! Occurrences of calendar events.

use almanac_recur::{DateWindow, ExpansionOptions, expand_with_options};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::ServiceResult;
use crate::event::Event;

/// One instance of an event on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOccurrence {
    pub event_id: i64,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Whether this is the event's own start rather than a repetition.
    pub is_original: bool,
}

/// ## Summary
/// Lists the occurrences of an event whose start date falls in `window`.
///
/// Recurring events are expanded in `tz`, so day boundaries and wall-clock
/// times follow that zone. A single event has exactly one occurrence, which
/// is returned whatever the window.
///
/// ## Errors
/// Returns an error if the event's rule cannot be expanded or exceeds
/// `options.max_occurrences` in the window.
pub fn event_occurrences(
    event: &Event,
    window: DateWindow,
    tz: Tz,
    options: &ExpansionOptions,
) -> ServiceResult<Vec<EventOccurrence>> {
    let start = event.start.with_timezone(&tz);
    let end = event.end.with_timezone(&tz);

    let Some(rule) = &event.recurrence else {
        return Ok(vec![EventOccurrence {
            event_id: event.id,
            start,
            end,
            is_original: true,
        }]);
    };

    let occurrences = expand_with_options(&start, &end, rule, window, options)?;
    tracing::debug!(
        event_id = event.id,
        count = occurrences.len(),
        "Listed event occurrences"
    );

    Ok(occurrences
        .into_iter()
        .map(|occurrence| EventOccurrence {
            event_id: event.id,
            is_original: occurrence.is_anchor(),
            start: occurrence.start,
            end: occurrence.end,
        })
        .collect())
}
