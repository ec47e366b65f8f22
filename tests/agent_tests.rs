use crate::google_calendar_mock::{timed_event, CalendarCall, MockCalendar};
use async_trait::async_trait;
use flowpilot::agent::{Action, CalendarAgent, Dispatcher, Payload, Status};
use flowpilot::components::CompletionProvider;
use flowpilot::error::{transport_error, AgentResult, Error};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Completion provider that answers every prompt with the same text
pub struct ScriptedCompletion {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    async fn complete(&self, prompt: &str) -> AgentResult<String> {
        self.prompts.lock().await.push(prompt.to_string());
        self.reply
            .clone()
            .map_err(|message| transport_error("Scripted", &message))
    }
}

pub fn agent(
    completion: Arc<ScriptedCompletion>,
    calendar: MockCalendar,
) -> CalendarAgent<MockCalendar> {
    CalendarAgent::new(
        completion,
        Dispatcher::new(calendar, "primary", "Scheduled by FlowPilot"),
        chrono_tz::UTC,
    )
}

#[tokio::test]
async fn test_create_from_chatty_model_output() {
    let completion = ScriptedCompletion::answering(
        "Sure! Here's the JSON: {\"action\":\"create\",\"summary\":\"meeting\",\
         \"start\":\"2025-08-10T14:00:00-04:00\",\"end\":\"2025-08-10T15:00:00-04:00\"} \
         Let me know if you need anything else.",
    );
    let calendar = MockCalendar::new();
    let agent = agent(completion.clone(), calendar.clone());

    let result = agent
        .interpret_and_execute("create meeting tomorrow at 2pm for 1 hour")
        .await
        .unwrap();

    assert_eq!(result.status, Status::Created);
    assert_eq!(result.message, "Created event: meeting");

    let prompts = completion.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("User command: \"create meeting tomorrow at 2pm for 1 hour\""));

    let calls = calendar.calls().await;
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], CalendarCall::Insert(..)));
}

#[tokio::test]
async fn test_quasi_json_list() {
    let completion = ScriptedCompletion::answering("{'action': 'list', 'summary': None}");
    let calendar = MockCalendar::new();

    let result = agent(completion, calendar)
        .interpret_and_execute("what do I have this week?")
        .await
        .unwrap();

    assert_eq!(result.status, Status::Listed);
    assert_eq!(result.message, "Found 0 upcoming events");
}

#[tokio::test]
async fn test_unparseable_output_is_wrapped_parse_error() {
    let completion = ScriptedCompletion::answering("I'm sorry, I can't help with calendars.");
    let calendar = MockCalendar::new();

    let err = agent(completion, calendar.clone())
        .interpret_and_execute("delete everything")
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Failed to interpret command: "));
    match err.root() {
        Error::Parse { raw, candidate, .. } => {
            assert_eq!(raw, "I'm sorry, I can't help with calendars.");
            assert_eq!(candidate, &None);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(calendar.calls().await.is_empty());
}

#[tokio::test]
async fn test_completion_failure_is_wrapped_transport_error() {
    let completion = ScriptedCompletion::failing("connection refused");
    let calendar = MockCalendar::new();

    let err = agent(completion, calendar.clone())
        .interpret_and_execute("list events")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Command(_)));
    assert!(err.to_string().contains("connection refused"));
    assert!(matches!(err.root(), Error::Transport { service: "Scripted", .. }));
    assert!(calendar.calls().await.is_empty());
}

#[tokio::test]
async fn test_incomplete_create_is_wrapped_validation_error() {
    let completion =
        ScriptedCompletion::answering(r#"{"action":"create","summary":"lunch","start":null,"end":null}"#);
    let calendar = MockCalendar::new();

    let err = agent(completion, calendar.clone())
        .interpret_and_execute("create lunch sometime")
        .await
        .unwrap_err();

    assert!(matches!(err.root(), Error::Validation(_)));
    assert!(err
        .to_string()
        .contains("Start and end times are required for creating events"));
    assert!(calendar.calls().await.is_empty());
}

#[tokio::test]
async fn test_empty_command_never_reaches_model() {
    let completion = ScriptedCompletion::answering(r#"{"action":"list"}"#);
    let agent = agent(completion.clone(), MockCalendar::new());

    let err = agent.interpret_and_execute("   ").await.unwrap_err();

    assert!(matches!(err.root(), Error::Validation(_)));
    assert!(completion.prompts().await.is_empty());
}

#[tokio::test]
async fn test_interpret_does_not_touch_calendar() {
    let completion = ScriptedCompletion::answering(
        "```json\n{\"action\": \"delete\", \"target\": \"2pm meeting\"}\n```",
    );
    let calendar = MockCalendar::with_events(vec![timed_event(
        "m1",
        "2pm meeting",
        "2025-08-10T14:00:00Z",
        "2025-08-10T15:00:00Z",
    )]);

    let intent = agent(completion, calendar.clone())
        .interpret("cancel my 2pm meeting")
        .await
        .unwrap();

    assert_eq!(intent.action, Some(Action::Delete));
    assert_eq!(intent.target.as_deref(), Some("2pm meeting"));
    assert!(calendar.calls().await.is_empty());
}

#[tokio::test]
async fn test_commands_are_independent() {
    let completion =
        ScriptedCompletion::answering(r#"{"action":"delete","target":"2pm meeting"}"#);
    let calendar = MockCalendar::with_events(vec![timed_event(
        "m1",
        "2pm meeting",
        "2025-08-10T14:00:00Z",
        "2025-08-10T15:00:00Z",
    )]);
    let agent = agent(completion.clone(), calendar.clone());

    let first = agent.interpret_and_execute("cancel the dentist visit").await.unwrap();
    assert_eq!(first.status, Status::Deleted);
    assert!(matches!(first.payload, Some(Payload::Event(ref e)) if e.id == "m1"));

    let second = agent.interpret_and_execute("drop the 2pm meeting").await.unwrap();
    assert_eq!(second.status, Status::NotFound);

    // The second prompt carries no trace of the first command
    let prompts = completion.prompts().await;
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("User command: \"cancel the dentist visit\""));
    assert!(prompts[1].contains("User command: \"drop the 2pm meeting\""));
    assert!(!prompts[1].contains("cancel the dentist visit"));
}
