use std::fs;
use std::path::Path;

use almanac_recur::{DateWindow, RecurrenceRule, RuleRecord, Violations, describe_record};
use almanac_service::{Calendar, Event, EventQuery, EventRecord, validate_event};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

fn read_records(path: &Path) -> Result<Vec<EventRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid event JSON in {}", path.display()))
}

fn read_events(path: &Path) -> Result<Vec<Event>> {
    read_records(path)?
        .iter()
        .map(|record| {
            Event::try_from(record).with_context(|| format!("Event {} is invalid", record.id))
        })
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn today(calendar: &Calendar) -> NaiveDate {
    Utc::now().with_timezone(&calendar.tz).date_naive()
}

pub fn list(calendar: &Calendar, events: &Path, query: &EventQuery) -> Result<()> {
    let events = read_events(events)?;
    let views = calendar.list_events(&events, query, today(calendar))?;
    print_json(&views)
}

pub fn expand(
    calendar: &Calendar,
    events: &Path,
    id: Option<i64>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<()> {
    let window = DateWindow::new(from, to)?;
    let mut occurrences = Vec::new();
    for event in read_events(events)?
        .iter()
        .filter(|event| id.is_none_or(|id| event.id == id))
    {
        occurrences.extend(calendar.occurrences(event, window)?);
    }
    occurrences.sort_by_key(|occurrence| occurrence.start);
    tracing::info!(count = occurrences.len(), "Expanded events");
    print_json(&occurrences)
}

#[derive(Serialize)]
struct Description {
    description: String,
    rrule: Option<String>,
    violations: Option<Violations>,
}

pub fn describe(rule: &str) -> Result<()> {
    let record: RuleRecord = serde_json::from_str(rule).context("Invalid rule JSON")?;
    let (rrule, violations) = match RecurrenceRule::try_from(&record) {
        Ok(rule) => (Some(rule.to_string()), None),
        Err(violations) => (None, Some(violations)),
    };
    print_json(&Description {
        description: describe_record(&record),
        rrule,
        violations,
    })
}

#[derive(Serialize)]
struct Report {
    id: i64,
    violations: Violations,
}

pub fn validate_events(events: &Path) -> Result<()> {
    let reports: Vec<Report> = read_records(events)?
        .iter()
        .filter_map(|record| {
            validate_event(record).err().map(|violations| Report {
                id: record.id,
                violations,
            })
        })
        .collect();

    print_json(&reports)?;
    if !reports.is_empty() {
        anyhow::bail!("{} of the event records are invalid", reports.len());
    }
    Ok(())
}

pub fn upcoming(calendar: &Calendar, events: &Path, from: Option<NaiveDate>) -> Result<()> {
    let events = read_events(events)?;
    let from = from.unwrap_or_else(|| today(calendar));
    print_json(&calendar.upcoming(&events, from)?)
}
