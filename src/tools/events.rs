/// Tools for calendar events
///
/// This module implements the event_add, event_list and event_delete MCP
/// tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{sort_events, CalendarEvent, DateKey, DomainError, EventCategory};
use crate::storage::{CalendarStore, StorageError};
use crate::tools::{date_or_today, parse_record_id, plural};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddEventParams {
    pub title: String,
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
    #[schemars(description = "birthday, appointment, reminder or other (default other)")]
    pub category: Option<String>,
    #[schemars(description = "Start time as HH:MM")]
    pub time: Option<String>,
    pub description: Option<String>,
    #[schemars(description = "Display color, e.g. #f472b6")]
    pub color: Option<String>,
    #[schemars(description = "Recurrence such as yearly or monthly")]
    pub recurrence: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddEventResponse {
    pub success: bool,
    pub event: CalendarEvent,
    pub message: String,
}

pub fn event_add<S: CalendarStore>(
    storage: &S,
    params: AddEventParams,
    today: DateKey,
) -> Result<AddEventResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let category = params.category.as_deref().map(str::parse::<EventCategory>).transpose()?.unwrap_or_default();

    let mut event = CalendarEvent::new(date, &params.title, category)?
        .with_description(params.description)?
        .with_time(params.time)?
        .with_recurrence(params.recurrence)?;
    event.color = params.color.filter(|c| !c.trim().is_empty());

    let event = storage.create_event(event)?;
    let when = match &event.time {
        Some(time) => format!("{} at {}", event.date, time),
        None => event.date.to_string(),
    };
    let message = format!("📅 Added {} '{}' on {}", event.category, event.title, when);
    Ok(AddEventResponse { success: true, event, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListEventsParams {
    #[schemars(description = "Single day as YYYY-MM-DD; overrides start/end")]
    pub date: Option<String>,
    #[schemars(description = "First day of a range (YYYY-MM-DD)")]
    pub start: Option<String>,
    #[schemars(description = "Last day of a range (YYYY-MM-DD), inclusive")]
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    pub success: bool,
    pub events: Vec<CalendarEvent>,
    pub message: String,
}

/// Events for a day, a range, or everything when no bounds are given
pub fn event_list<S: CalendarStore>(storage: &S, params: ListEventsParams) -> Result<ListEventsResponse, StorageError> {
    let parse = |raw: Option<&str>| raw.map(str::parse::<DateKey>).transpose();

    let mut events = match (parse(params.date.as_deref())?, parse(params.start.as_deref())?, parse(params.end.as_deref())?) {
        (Some(date), _, _) => storage.events_by_date(date)?,
        (None, Some(start), Some(end)) => {
            if end < start {
                return Err(DomainError::InvalidDate(format!("range end {} is before start {}", end, start)).into());
            }
            storage.events_in_range(start, end)?
        }
        (None, None, None) => storage.list_events()?,
        _ => return Err(DomainError::validation("Give both start and end for a range").into()),
    };
    sort_events(&mut events);

    let message = format!("{} event{}", events.len(), plural(events.len()));
    Ok(ListEventsResponse { success: true, events, message })
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteEventParams {
    pub event_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteEventResponse {
    pub success: bool,
    pub message: String,
}

pub fn event_delete<S: CalendarStore>(storage: &S, params: DeleteEventParams) -> Result<DeleteEventResponse, StorageError> {
    let id = parse_record_id("Event ID", &params.event_id)?;
    storage.delete_event(&id)?;
    Ok(DeleteEventResponse { success: true, message: "🗑️ Event deleted".to_string() })
}
