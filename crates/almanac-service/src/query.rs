//! Event listing over date windows.

use almanac_core::config::Settings;
use almanac_recur::{DateWindow, ExpansionOptions, describe};
use chrono::{Days, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::event::{Event, EventRecord};
use crate::occurrence::{EventOccurrence, event_occurrences};

/// Filters for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub show_occurrences: bool,
}

/// An event as returned by a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: EventRecord,
    /// English summary of the recurrence rule, for recurring events.
    pub recurrence_description: Option<String>,
    /// RFC 3339 start instants, present when occurrences were requested.
    pub occurrences: Option<Vec<String>>,
}

/// Listing parameters shared by every query: the zone in which dates are
/// read and the expansion limits.
#[derive(Debug, Clone)]
pub struct Calendar {
    pub tz: Tz,
    pub options: ExpansionOptions,
    /// Days after today that open-ended occurrence listings reach.
    pub horizon_days: u32,
    pub upcoming_days: u32,
}

impl Calendar {
    /// ## Summary
    /// Builds a calendar from loaded settings.
    ///
    /// ## Errors
    /// Returns an error if the configured timezone is unknown.
    pub fn from_settings(settings: &Settings) -> ServiceResult<Self> {
        let max_occurrences = usize::try_from(settings.expansion.max_occurrences)
            .map_err(|e| {
                ServiceError::OutOfRange(format!(
                    "max_occurrences {}: {e}",
                    settings.expansion.max_occurrences
                ))
            })?;
        Ok(Self {
            tz: settings.calendar.tz()?,
            options: ExpansionOptions::default().with_max_occurrences(max_occurrences),
            horizon_days: settings.expansion.default_horizon_days,
            upcoming_days: settings.expansion.upcoming_days,
        })
    }

    fn start_date(&self, event: &Event) -> NaiveDate {
        event.start.with_timezone(&self.tz).date_naive()
    }

    fn days_after(today: NaiveDate, days: u32) -> ServiceResult<NaiveDate> {
        today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                ServiceError::OutOfRange(format!("{today} + {days} days"))
            })
    }

    /// ## Summary
    /// Lists events ordered by start time.
    ///
    /// When the query has both dates, single events are kept only if they
    /// start inside that window; recurring events are always kept. With
    /// `show_occurrences`, each event carries its occurrences from
    /// `start_date` (default: the later of the event's start date and
    /// `today`) through `end_date` (default: `horizon_days` after `today`).
    ///
    /// ## Errors
    /// Returns an error if the query's dates are reversed or an event cannot
    /// be expanded.
    pub fn list_events(
        &self,
        events: &[Event],
        query: &EventQuery,
        today: NaiveDate,
    ) -> ServiceResult<Vec<EventView>> {
        let filter = match (query.start_date, query.end_date) {
            (Some(start), Some(end)) => Some(DateWindow::new(start, end)?),
            _ => None,
        };

        let mut selected: Vec<&Event> = events
            .iter()
            .filter(|event| {
                event.is_recurring()
                    || filter.is_none_or(|window| window.contains(self.start_date(event)))
            })
            .collect();
        selected.sort_by_key(|event| event.start);

        tracing::debug!(
            total = events.len(),
            selected = selected.len(),
            ?filter,
            "Filtered events"
        );

        let horizon = match query.end_date {
            Some(end) => end,
            None => Self::days_after(today, self.horizon_days)?,
        };

        selected
            .into_iter()
            .map(|event| {
                let occurrences = query
                    .show_occurrences
                    .then(|| {
                        let from = query
                            .start_date
                            .unwrap_or_else(|| self.start_date(event).max(today));
                        self.occurrence_starts(event, from, horizon)
                    })
                    .transpose()?;
                Ok(view(event, occurrences))
            })
            .collect()
    }

    /// ## Summary
    /// Lists the events happening in the `upcoming_days` days from `today`,
    /// each with its occurrences in that range.
    ///
    /// Single events must start in the range; recurring events must have at
    /// least one occurrence in it.
    ///
    /// ## Errors
    /// Returns an error if an event cannot be expanded.
    pub fn upcoming(&self, events: &[Event], today: NaiveDate) -> ServiceResult<Vec<EventView>> {
        let window = DateWindow::new(today, Self::days_after(today, self.upcoming_days)?)?;

        let mut selected: Vec<&Event> = events
            .iter()
            .filter(|event| event.is_recurring() || window.contains(self.start_date(event)))
            .collect();
        selected.sort_by_key(|event| event.start);

        let mut views = Vec::new();
        for event in selected {
            let starts = self.occurrence_starts(event, window.start(), window.end())?;
            if event.is_recurring() && starts.is_empty() {
                continue;
            }
            views.push(view(event, Some(starts)));
        }

        tracing::debug!(%today, count = views.len(), "Listed upcoming events");
        Ok(views)
    }

    /// ## Summary
    /// Lists an event's occurrences between two dates, inclusive.
    ///
    /// ## Errors
    /// Returns an error if the event cannot be expanded.
    pub fn occurrences(
        &self,
        event: &Event,
        window: DateWindow,
    ) -> ServiceResult<Vec<EventOccurrence>> {
        event_occurrences(event, window, self.tz, &self.options)
    }

    /// Start instants of an event's occurrences. A reversed range holds no
    /// repetitions, but a single event still has its one occurrence.
    fn occurrence_starts(
        &self,
        event: &Event,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ServiceResult<Vec<String>> {
        let window = match DateWindow::new(from, to) {
            Ok(window) => window,
            Err(_) if !event.is_recurring() => DateWindow::single_day(from),
            Err(_) => return Ok(Vec::new()),
        };
        let occurrences = self.occurrences(event, window)?;
        Ok(occurrences
            .iter()
            .map(|occurrence| occurrence.start.to_rfc3339())
            .collect())
    }
}

fn view(event: &Event, occurrences: Option<Vec<String>>) -> EventView {
    EventView {
        event: EventRecord::from(event),
        recurrence_description: event.recurrence.as_ref().map(describe),
        occurrences,
    }
}
