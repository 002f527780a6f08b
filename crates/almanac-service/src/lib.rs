//! Calendar events built on recurrence rules: event records, their
//! validation, occurrence listing and date-window queries.

pub mod error;
pub mod event;
pub mod occurrence;
pub mod query;

pub use error::{ServiceError, ServiceResult};
pub use event::{Event, EventRecord, validate_event};
pub use occurrence::{EventOccurrence, event_occurrences};
pub use query::{Calendar, EventQuery, EventView};
