use super::actor::{GoogleCalendarActor, GoogleCalendarActorHandle};
use super::models::{CalendarEvent, EventFilter};
use crate::components::CalendarCapability;
use crate::config::Config;
use crate::error::AgentResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarHandle {
    actor_handle: GoogleCalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl GoogleCalendarHandle {
    /// Create a new GoogleCalendarHandle and spawn the actor
    pub fn new(config: &Config) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = GoogleCalendarActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AgentResult<()> {
        self.actor_handle.shutdown().await
    }
}

#[async_trait]
impl CalendarCapability for GoogleCalendarHandle {
    async fn list_events(&self, filter: EventFilter) -> AgentResult<Vec<CalendarEvent>> {
        self.actor_handle.list_events(filter).await
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        self.actor_handle.insert_event(calendar_id, event).await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        self.actor_handle
            .update_event(calendar_id, event_id, event)
            .await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AgentResult<()> {
        self.actor_handle.delete_event(calendar_id, event_id).await
    }
}
