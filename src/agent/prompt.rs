use crate::components::CompletionProvider;
use crate::error::AgentResult;
use crate::utils::time::prompt_timestamp;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

const PROMPT_TEMPLATE: &str = r#"You are a calendar assistant. Given this user command, extract the intent and return only valid JSON with these fields:
- action: "create" | "move" | "reschedule" | "delete" | "find" | "list"
- summary: (event title/description)
- start: (ISO datetime string or null)
- end: (ISO datetime string or null)
- target: (if moving/rescheduling/deleting - text to find the event)

The current date and time is {now} ({timezone}).

For date/time parsing:
- "tomorrow at 2pm" should be converted to ISO datetime
- "next Monday at 10am" should be converted to ISO datetime
- "in 1 hour" should be converted to ISO datetime
- Always include timezone offset

Examples:
- "create meeting tomorrow at 2pm for 1 hour" → {"action":"create","summary":"meeting","start":"2025-08-10T14:00:00-04:00","end":"2025-08-10T15:00:00-04:00"}
- "delete my meeting tomorrow" → {"action":"delete","summary":null,"start":null,"end":null,"target":"meeting tomorrow"}
- "remove the test event" → {"action":"delete","summary":null,"start":null,"end":null,"target":"test event"}
- "cancel my 2pm meeting" → {"action":"delete","summary":null,"start":null,"end":null,"target":"2pm meeting"}
- "list events" → {"action":"list","summary":null,"start":null,"end":null}

User command: "{command}"

Return only the JSON object, no other text."#;

/// Fill the instruction template. The command is inserted last and verbatim.
pub fn build_prompt(utterance: &str, now: DateTime<Utc>, timezone: &Tz) -> String {
    PROMPT_TEMPLATE
        .replace("{now}", &prompt_timestamp(now, timezone))
        .replace("{timezone}", timezone.name())
        .replace("{command}", utterance)
}

/// Ask the provider to interpret one command and return its raw answer
pub async fn request_completion(
    provider: &dyn CompletionProvider,
    utterance: &str,
    now: DateTime<Utc>,
    timezone: &Tz,
) -> AgentResult<String> {
    let prompt = build_prompt(utterance, now, timezone);
    debug!("Prompt: {}", prompt);

    let raw = provider.complete(&prompt).await?;
    info!(
        "Received {} characters from {}",
        raw.chars().count(),
        provider.name()
    );
    Ok(raw)
}
