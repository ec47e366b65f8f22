use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Start or end of an event as the Calendar API represents it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// All-day events carry a date instead of a date-time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn at(date_time: &str) -> Self {
        Self {
            date_time: Some(date_time.to_string()),
            ..Default::default()
        }
    }

    /// Point in time used for ordering, all-day dates count from midnight UTC
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        if let Some(date_time) = &self.date_time {
            return DateTime::parse_from_rfc3339(date_time)
                .ok()
                .map(|dt| dt.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;
        Some(date.and_hms_opt(0, 0, 0)?.and_utc())
    }
}

/// Calendar event. Fields the agent does not use are kept in `extra`
/// so an update sends the event back unchanged apart from its times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CalendarEvent {
    /// Title for messages, falling back to a generic label
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("(untitled)")
    }

    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start.as_ref().and_then(EventDateTime::instant)
    }
}

/// Sort order of the events list endpoint. Only start-time ordering is
/// requested since candidates are ranked by start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    StartTime,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::StartTime => "startTime",
        }
    }
}

/// Query for the events list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EventFilter {
    pub calendar_id: String,
    /// Free-text search over summary, description and location
    pub query: Option<String>,
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    pub max_results: u32,
    pub order_by: OrderBy,
    /// Expand recurring events into single instances
    pub single_events: bool,
}

impl EventFilter {
    /// Start-ordered filter over single event instances
    pub fn new(calendar_id: &str, max_results: u32) -> Self {
        Self {
            calendar_id: calendar_id.to_string(),
            query: None,
            time_min: None,
            time_max: None,
            max_results,
            order_by: OrderBy::StartTime,
            single_events: true,
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    pub fn between(mut self, time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        self.time_min = Some(time_min);
        self.time_max = Some(time_max);
        self
    }

    /// Query string pairs in the form the REST API expects
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(query) = &self.query {
            pairs.push(("q", query.clone()));
        }
        if let Some(time_min) = &self.time_min {
            pairs.push(("timeMin", time_min.to_rfc3339()));
        }
        if let Some(time_max) = &self.time_max {
            pairs.push(("timeMax", time_max.to_rfc3339()));
        }
        pairs.push(("singleEvents", self.single_events.to_string()));
        pairs.push(("orderBy", self.order_by.as_str().to_string()));
        pairs.push(("maxResults", self.max_results.to_string()));
        pairs
    }
}
