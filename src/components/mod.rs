use crate::error::AgentResult;
use async_trait::async_trait;
use std::sync::Arc;

// Export components
pub mod completion;
pub mod google_calendar;

// Re-export Google Calendar handle
pub use google_calendar::GoogleCalendarHandle;

use google_calendar::models::{CalendarEvent, EventFilter};

/// Text-generation backend. One prompt in, raw model text out,
/// with no memory between calls.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Name used in logs and transport errors
    fn name(&self) -> &'static str;

    /// Send a single-turn prompt and return the unmodified response text
    async fn complete(&self, prompt: &str) -> AgentResult<String>;
}

/// Calendar backend the dispatcher reads and mutates.
/// Errors are propagated to the caller unmodified.
#[async_trait]
pub trait CalendarCapability: Send + Sync {
    async fn list_events(&self, filter: EventFilter) -> AgentResult<Vec<CalendarEvent>>;

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent>;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AgentResult<()>;
}

#[async_trait]
impl<T: CalendarCapability + ?Sized> CalendarCapability for Arc<T> {
    async fn list_events(&self, filter: EventFilter) -> AgentResult<Vec<CalendarEvent>> {
        (**self).list_events(filter).await
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        (**self).insert_event(calendar_id, event).await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        (**self).update_event(calendar_id, event_id, event).await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AgentResult<()> {
        (**self).delete_event(calendar_id, event_id).await
    }
}
