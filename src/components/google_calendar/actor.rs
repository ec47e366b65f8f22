use super::models::{CalendarEvent, EventFilter};
use crate::config::Config;
use crate::error::{transport_error, AgentResult};
use reqwest::{Client, Response};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::Url;

const SERVICE: &str = "Google Calendar";

/// The Google Calendar actor that processes messages
pub struct GoogleCalendarActor {
    api: CalendarApi,
    command_rx: mpsc::Receiver<GoogleCalendarCommand>,
}

/// Commands that can be sent to the Google Calendar actor
pub enum GoogleCalendarCommand {
    ListEvents(EventFilter, mpsc::Sender<AgentResult<Vec<CalendarEvent>>>),
    InsertEvent(String, CalendarEvent, mpsc::Sender<AgentResult<CalendarEvent>>),
    UpdateEvent(
        String,
        String,
        CalendarEvent,
        mpsc::Sender<AgentResult<CalendarEvent>>,
    ),
    DeleteEvent(String, String, mpsc::Sender<AgentResult<()>>),
    Shutdown,
}

/// Handle for communicating with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarActorHandle {
    command_tx: mpsc::Sender<GoogleCalendarCommand>,
}

impl GoogleCalendarActorHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<AgentResult<T>>) -> GoogleCalendarCommand,
    ) -> AgentResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(build(response_tx))
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| transport_error(SERVICE, "Response channel closed"))?
    }

    pub async fn list_events(&self, filter: EventFilter) -> AgentResult<Vec<CalendarEvent>> {
        self.request(|tx| GoogleCalendarCommand::ListEvents(filter, tx))
            .await
    }

    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        let calendar_id = calendar_id.to_string();
        self.request(|tx| GoogleCalendarCommand::InsertEvent(calendar_id, event, tx))
            .await
    }

    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        let (calendar_id, event_id) = (calendar_id.to_string(), event_id.to_string());
        self.request(|tx| GoogleCalendarCommand::UpdateEvent(calendar_id, event_id, event, tx))
            .await
    }

    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AgentResult<()> {
        let (calendar_id, event_id) = (calendar_id.to_string(), event_id.to_string());
        self.request(|tx| GoogleCalendarCommand::DeleteEvent(calendar_id, event_id, tx))
            .await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AgentResult<()> {
        let _ = self.command_tx.send(GoogleCalendarCommand::Shutdown).await;
        Ok(())
    }
}

impl GoogleCalendarActor {
    /// Create a new actor and return its handle
    pub fn new(config: &Config) -> (Self, GoogleCalendarActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            api: CalendarApi {
                client: Client::new(),
                base_url: config.google_calendar_api_url.clone(),
                access_token: Arc::from(config.google_access_token.as_str()),
            },
            command_rx,
        };

        (actor, GoogleCalendarActorHandle { command_tx })
    }

    /// Start the actor's processing loop. Each request runs on its own task
    /// so independent commands do not wait on each other.
    pub async fn run(&mut self) {
        info!("Google Calendar actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            let api = self.api.clone();
            match cmd {
                GoogleCalendarCommand::ListEvents(filter, response_tx) => {
                    tokio::spawn(async move {
                        let _ = response_tx.send(api.list_events(&filter).await).await;
                    });
                }
                GoogleCalendarCommand::InsertEvent(calendar_id, event, response_tx) => {
                    tokio::spawn(async move {
                        let result = api.insert_event(&calendar_id, &event).await;
                        let _ = response_tx.send(result).await;
                    });
                }
                GoogleCalendarCommand::UpdateEvent(calendar_id, event_id, event, response_tx) => {
                    tokio::spawn(async move {
                        let result = api.update_event(&calendar_id, &event_id, &event).await;
                        let _ = response_tx.send(result).await;
                    });
                }
                GoogleCalendarCommand::DeleteEvent(calendar_id, event_id, response_tx) => {
                    tokio::spawn(async move {
                        let result = api.delete_event(&calendar_id, &event_id).await;
                        let _ = response_tx.send(result).await;
                    });
                }
                GoogleCalendarCommand::Shutdown => {
                    info!("Google Calendar actor shutting down");
                    break;
                }
            }
        }

        info!("Google Calendar actor shut down");
    }
}

/// Thin REST client for the events collection of the Calendar API
#[derive(Clone)]
struct CalendarApi {
    client: Client,
    base_url: String,
    access_token: Arc<str>,
}

impl CalendarApi {
    async fn list_events(&self, filter: &EventFilter) -> AgentResult<Vec<CalendarEvent>> {
        let mut url = events_url(&self.base_url, &filter.calendar_id, None)?;
        for (key, value) in filter.query_pairs() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        debug!("Listing events: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&*self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Failed to fetch events: {}", e)))?;
        let response = check_status(response, "fetch events").await?;

        let response_data: Value = response.json().await.map_err(|e| {
            transport_error(SERVICE, &format!("Failed to parse events response: {}", e))
        })?;

        parse_items(response_data)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        let url = events_url(&self.base_url, calendar_id, None)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&*self.access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Failed to create event: {}", e)))?;
        let response = check_status(response, "create event").await?;

        response.json().await.map_err(|e| {
            transport_error(SERVICE, &format!("Failed to parse created event: {}", e))
        })
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> AgentResult<CalendarEvent> {
        let url = events_url(&self.base_url, calendar_id, Some(event_id))?;
        let response = self
            .client
            .put(url)
            .bearer_auth(&*self.access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Failed to update event: {}", e)))?;
        let response = check_status(response, "update event").await?;

        response.json().await.map_err(|e| {
            transport_error(SERVICE, &format!("Failed to parse updated event: {}", e))
        })
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AgentResult<()> {
        let url = events_url(&self.base_url, calendar_id, Some(event_id))?;
        let response = self
            .client
            .delete(url)
            .bearer_auth(&*self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Failed to delete event: {}", e)))?;
        check_status(response, "delete event").await?;
        Ok(())
    }
}

/// Turn a non-success response into a transport error carrying the body
async fn check_status(response: Response, action: &str) -> AgentResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    Err(transport_error(
        SERVICE,
        &format!("Failed to {}: HTTP {} - {}", action, status, error_body),
    ))
}

/// `{base}/calendars/{calendar_id}/events[/{event_id}]` with encoded segments
fn events_url(base_url: &str, calendar_id: &str, event_id: Option<&str>) -> AgentResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| transport_error(SERVICE, &format!("Failed to parse URL: {}", e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| transport_error(SERVICE, "Calendar API URL cannot be a base"))?;
        segments.pop_if_empty().extend(["calendars", calendar_id, "events"]);
        if let Some(event_id) = event_id {
            segments.push(event_id);
        }
    }
    Ok(url)
}

fn parse_items(response_data: Value) -> AgentResult<Vec<CalendarEvent>> {
    match response_data.get("items") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items.clone()).map_err(|e| {
            transport_error(SERVICE, &format!("Malformed events in response: {}", e))
        }),
    }
}
