use super::intent::{Action, Intent};
use crate::components::google_calendar::models::{CalendarEvent, EventDateTime, EventFilter};
use crate::components::CalendarCapability;
use crate::config::Config;
use crate::error::AgentResult;
use crate::utils::time::forward_window;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Candidates fetched when looking for an event to move or delete
pub const SEARCH_LIMIT: u32 = 10;
/// Events returned by list/find
pub const LIST_LIMIT: u32 = 10;
/// Days ahead covered by list/find
pub const LIST_WINDOW_DAYS: i64 = 7;

/// Outcome of a dispatched intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Created,
    Updated,
    Listed,
    Deleted,
    NotFound,
    Unhandled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Event(CalendarEvent),
    Events(Vec<CalendarEvent>),
    /// The intent as parsed, for actions nothing handles
    Intent(Intent),
}

/// Uniform result returned for every command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl ResultEnvelope {
    fn new(status: Status, message: String, payload: Option<Payload>) -> Self {
        Self {
            status,
            message,
            payload,
        }
    }
}

/// Executes one intent against the calendar
pub struct Dispatcher<C> {
    calendar: C,
    calendar_id: String,
    default_summary: String,
}

impl<C: CalendarCapability> Dispatcher<C> {
    pub fn new(calendar: C, calendar_id: &str, default_summary: &str) -> Self {
        Self {
            calendar,
            calendar_id: calendar_id.to_string(),
            default_summary: default_summary.to_string(),
        }
    }

    pub fn from_config(calendar: C, config: &Config) -> Self {
        Self::new(
            calendar,
            &config.google_calendar_id,
            &config.default_event_summary,
        )
    }

    /// Execute an intent. `utterance` is the user's original command.
    pub async fn dispatch(&self, intent: &Intent, utterance: &str) -> AgentResult<ResultEnvelope> {
        self.dispatch_at(intent, utterance, Utc::now()).await
    }

    /// Execute an intent with an explicit clock for the list window
    pub async fn dispatch_at(
        &self,
        intent: &Intent,
        utterance: &str,
        now: DateTime<Utc>,
    ) -> AgentResult<ResultEnvelope> {
        info!("Dispatching action '{}'", intent.action_name());

        match &intent.action {
            Some(Action::Create) => self.create(intent, utterance).await,
            Some(Action::Move) | Some(Action::Reschedule) => {
                self.reschedule(intent, utterance).await
            }
            Some(Action::List) | Some(Action::Find) => self.list(now).await,
            Some(Action::Delete) => self.delete(intent, utterance).await,
            Some(Action::Other(_)) | None => Ok(ResultEnvelope::new(
                Status::Unhandled,
                format!("Action '{}' not implemented yet", intent.action_name()),
                Some(Payload::Intent(intent.clone())),
            )),
        }
    }

    async fn create(&self, intent: &Intent, utterance: &str) -> AgentResult<ResultEnvelope> {
        let (start, end) = intent.required_times()?;

        let summary = intent
            .summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.default_summary.clone());

        let event = CalendarEvent {
            summary: Some(summary.clone()),
            description: Some(utterance.to_string()),
            start: Some(EventDateTime::at(start)),
            end: Some(EventDateTime::at(end)),
            ..Default::default()
        };

        let created = self.calendar.insert_event(&self.calendar_id, event).await?;
        info!("Created event {}", created.id);

        Ok(ResultEnvelope::new(
            Status::Created,
            format!("Created event: {}", summary),
            Some(Payload::Event(created)),
        ))
    }

    async fn reschedule(&self, intent: &Intent, utterance: &str) -> AgentResult<ResultEnvelope> {
        // Reject bad times before touching the calendar
        intent.validate_present_times()?;

        let query = intent.search_query(utterance);
        let Some(mut target) = self.find_target(query).await? else {
            return Ok(not_found(query));
        };

        if let Some(start) = &intent.start {
            set_date_time(&mut target.start, start);
        }
        if let Some(end) = &intent.end {
            set_date_time(&mut target.end, end);
        }

        let message = format!("Updated event: {}", target.title());
        let event_id = target.id.clone();
        let updated = self
            .calendar
            .update_event(&self.calendar_id, &event_id, target)
            .await?;
        info!("Updated event {}", updated.id);

        Ok(ResultEnvelope::new(
            Status::Updated,
            message,
            Some(Payload::Event(updated)),
        ))
    }

    async fn list(&self, now: DateTime<Utc>) -> AgentResult<ResultEnvelope> {
        let (time_min, time_max) = forward_window(now, LIST_WINDOW_DAYS);
        let filter = EventFilter::new(&self.calendar_id, LIST_LIMIT).between(time_min, time_max);

        let events = self.calendar.list_events(filter).await?;

        Ok(ResultEnvelope::new(
            Status::Listed,
            format!("Found {} upcoming events", events.len()),
            Some(Payload::Events(events)),
        ))
    }

    async fn delete(&self, intent: &Intent, utterance: &str) -> AgentResult<ResultEnvelope> {
        let query = intent.search_query(utterance);
        let Some(target) = self.find_target(query).await? else {
            return Ok(not_found(query));
        };

        self.calendar
            .delete_event(&self.calendar_id, &target.id)
            .await?;
        info!("Deleted event {}", target.id);

        Ok(ResultEnvelope::new(
            Status::Deleted,
            format!("Deleted event: {}", target.title()),
            Some(Payload::Event(target)),
        ))
    }

    /// Search by free text and keep the earliest-starting match.
    /// Other matches are ignored even when the query is ambiguous.
    async fn find_target(&self, query: &str) -> AgentResult<Option<CalendarEvent>> {
        let filter = EventFilter::new(&self.calendar_id, SEARCH_LIMIT).with_query(query);
        let candidates = self.calendar.list_events(filter).await?;
        info!("{} candidate(s) for '{}'", candidates.len(), query);
        Ok(earliest(candidates))
    }
}

fn not_found(query: &str) -> ResultEnvelope {
    ResultEnvelope::new(
        Status::NotFound,
        format!("No events found matching: {}", query),
        None,
    )
}

/// Earliest start wins; ties and unparseable starts keep provider order
fn earliest(events: Vec<CalendarEvent>) -> Option<CalendarEvent> {
    events.into_iter().min_by_key(|event| {
        let start = event.start_instant();
        (start.is_none(), start)
    })
}

fn set_date_time(slot: &mut Option<EventDateTime>, value: &str) {
    let time = slot.get_or_insert_with(EventDateTime::default);
    time.date_time = Some(value.to_string());
    // An event cannot be timed and all-day at once
    time.date = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, start: Option<EventDateTime>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            start,
            ..Default::default()
        }
    }

    #[test]
    fn test_earliest_prefers_earliest_start() {
        let events = vec![
            event("late", Some(EventDateTime::at("2025-08-12T09:00:00Z"))),
            event("early", Some(EventDateTime::at("2025-08-10T09:00:00-04:00"))),
            event("undated", None),
        ];
        assert_eq!(earliest(events).unwrap().id, "early");

        let all_day = EventDateTime {
            date: Some("2025-08-10".to_string()),
            ..Default::default()
        };
        let events = vec![
            event("timed", Some(EventDateTime::at("2025-08-10T09:00:00Z"))),
            event("all_day", Some(all_day)),
        ];
        assert_eq!(earliest(events).unwrap().id, "all_day");

        assert!(earliest(Vec::new()).is_none());
    }

    #[test]
    fn test_earliest_keeps_provider_order_on_ties() {
        let events = vec![
            event("first", Some(EventDateTime::at("2025-08-10T09:00:00Z"))),
            event("second", Some(EventDateTime::at("2025-08-10T09:00:00Z"))),
        ];
        assert_eq!(earliest(events).unwrap().id, "first");

        let events = vec![event("a", None), event("b", None)];
        assert_eq!(earliest(events).unwrap().id, "a");
    }

    #[test]
    fn test_set_date_time_replaces_all_day_date() {
        let mut slot = Some(EventDateTime {
            date: Some("2025-08-10".to_string()),
            time_zone: Some("Europe/Helsinki".to_string()),
            ..Default::default()
        });
        set_date_time(&mut slot, "2025-08-10T17:00:00+03:00");
        let slot = slot.unwrap();
        assert_eq!(slot.date_time.as_deref(), Some("2025-08-10T17:00:00+03:00"));
        assert_eq!(slot.date, None);
        assert_eq!(slot.time_zone.as_deref(), Some("Europe/Helsinki"));

        let mut empty = None;
        set_date_time(&mut empty, "2025-08-10T17:00:00Z");
        assert_eq!(empty, Some(EventDateTime::at("2025-08-10T17:00:00Z")));
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = not_found("dentist");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            serde_json::json!({
                "status": "not_found",
                "message": "No events found matching: dentist"
            })
        );
    }
}
