//! Structured form of a user command as produced by the model.

use crate::error::{validation_error, AgentResult};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user wants done. Values the model invents are kept verbatim
/// in `Other` so they can be reported back instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Create,
    Move,
    Reschedule,
    Delete,
    Find,
    List,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Create => "create",
            Action::Move => "move",
            Action::Reschedule => "reschedule",
            Action::Delete => "delete",
            Action::Find => "find",
            Action::List => "list",
            Action::Other(value) => value,
        }
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        match value.as_str() {
            "create" => Action::Create,
            "move" => Action::Move,
            "reschedule" => Action::Reschedule,
            "delete" => Action::Delete,
            "find" => Action::Find,
            "list" => Action::List,
            _ => Action::Other(value),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed command. Absent fields stay `None`; JSON `null` means the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Event title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// ISO-8601 date-time with offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Search text identifying an existing event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Intent {
    /// Action name for messages, `(missing)` when the model gave none
    pub fn action_name(&self) -> &str {
        self.action.as_ref().map(Action::as_str).unwrap_or("(missing)")
    }

    /// Start and end of a new event. Both must be present and parse.
    pub fn required_times(&self) -> AgentResult<(&str, &str)> {
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => {
                parse_time("start", start)?;
                parse_time("end", end)?;
                Ok((start, end))
            }
            _ => Err(validation_error(
                "Start and end times are required for creating events",
            )),
        }
    }

    /// Check whichever of start and end are present
    pub fn validate_present_times(&self) -> AgentResult<()> {
        if let Some(start) = &self.start {
            parse_time("start", start)?;
        }
        if let Some(end) = &self.end {
            parse_time("end", end)?;
        }
        Ok(())
    }

    /// Free-text query for locating an existing event:
    /// target, then summary, then the user's own words
    pub fn search_query<'a>(&'a self, utterance: &'a str) -> &'a str {
        [self.target.as_deref(), self.summary.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or(utterance)
    }
}

fn parse_time(field: &str, value: &str) -> AgentResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|e| {
        validation_error(&format!(
            "'{}' is not an ISO-8601 date-time with offset for {}: {}",
            value, field, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_action_is_preserved() {
        let intent: Intent = serde_json::from_value(json!({"action": "snooze"})).unwrap();
        assert_eq!(intent.action, Some(Action::Other("snooze".to_string())));
        assert_eq!(intent.action_name(), "snooze");
        assert_eq!(serde_json::to_value(&intent).unwrap(), json!({"action": "snooze"}));
    }

    #[test]
    fn test_nulls_and_missing_fields_are_absent() {
        let intent: Intent = serde_json::from_value(json!({
            "action": "list",
            "summary": null,
            "start": null,
            "extra": "ignored"
        }))
        .unwrap();
        assert_eq!(
            intent,
            Intent {
                action: Some(Action::List),
                ..Default::default()
            }
        );

        let intent: Intent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(intent.action, None);
        assert_eq!(intent.action_name(), "(missing)");
    }

    #[test]
    fn test_required_times() {
        let mut intent = Intent {
            action: Some(Action::Create),
            start: Some("2025-08-10T14:00:00-04:00".to_string()),
            end: Some("2025-08-10T15:00:00-04:00".to_string()),
            ..Default::default()
        };
        assert!(intent.required_times().is_ok());

        intent.end = None;
        assert!(matches!(
            intent.required_times(),
            Err(crate::error::Error::Validation(_))
        ));

        intent.end = Some("3pm".to_string());
        let err = intent.required_times().unwrap_err();
        assert!(err.to_string().contains("'3pm'"));
    }

    #[test]
    fn test_validate_present_times() {
        let intent = Intent {
            action: Some(Action::Move),
            start: Some("2025-08-10T17:00:00+00:00".to_string()),
            ..Default::default()
        };
        assert!(intent.validate_present_times().is_ok());

        let intent = Intent {
            start: Some("tomorrow at 5".to_string()),
            ..intent
        };
        assert!(intent.validate_present_times().is_err());
    }

    #[test]
    fn test_search_query_fallback() {
        let mut intent = Intent {
            action: Some(Action::Delete),
            target: Some("2pm meeting".to_string()),
            summary: Some("meeting".to_string()),
            ..Default::default()
        };
        assert_eq!(intent.search_query("cancel my 2pm meeting"), "2pm meeting");

        intent.target = Some("  ".to_string());
        assert_eq!(intent.search_query("cancel my 2pm meeting"), "meeting");

        intent.summary = None;
        assert_eq!(
            intent.search_query("cancel my 2pm meeting"),
            "cancel my 2pm meeting"
        );
    }
}
