pub mod dispatch;
pub mod extract;
pub mod intent;
pub mod prompt;

pub use dispatch::{Dispatcher, Payload, ResultEnvelope, Status};
pub use extract::extract_intent;
pub use intent::{Action, Intent};

use crate::components::{CalendarCapability, CompletionProvider};
use crate::error::{validation_error, AgentResult, Error};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Interprets natural-language commands and applies them to a calendar.
/// Holds no per-command state; every call is independent.
pub struct CalendarAgent<C> {
    completion: Arc<dyn CompletionProvider>,
    dispatcher: Dispatcher<C>,
    timezone: Tz,
}

impl<C: CalendarCapability> CalendarAgent<C> {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        dispatcher: Dispatcher<C>,
        timezone: Tz,
    ) -> Self {
        Self {
            completion,
            dispatcher,
            timezone,
        }
    }

    /// Turn a command into an intent without executing it
    pub async fn interpret(&self, utterance: &str) -> AgentResult<Intent> {
        let span = info_span!("interpret", command_id = %Uuid::new_v4());
        self.interpret_at(utterance, Utc::now())
            .instrument(span)
            .await
            .map_err(wrap_failure)
    }

    /// Interpret a command and execute it against the calendar
    pub async fn interpret_and_execute(&self, utterance: &str) -> AgentResult<ResultEnvelope> {
        let span = info_span!("command", command_id = %Uuid::new_v4());
        async {
            let now = Utc::now();
            let intent = self.interpret_at(utterance, now).await?;
            let envelope = self.dispatcher.dispatch_at(&intent, utterance, now).await?;
            info!("Command finished with status {:?}", envelope.status);
            Ok::<_, Error>(envelope)
        }
        .instrument(span)
        .await
        .map_err(wrap_failure)
    }

    async fn interpret_at(&self, utterance: &str, now: DateTime<Utc>) -> AgentResult<Intent> {
        if utterance.trim().is_empty() {
            return Err(validation_error("No text provided"));
        }
        info!("Interpreting command: {}", utterance);

        let raw =
            prompt::request_completion(self.completion.as_ref(), utterance, now, &self.timezone)
                .await?;
        extract_intent(&raw)
    }
}

fn wrap_failure(e: Error) -> Error {
    error!("Error interpreting command: {}", e);
    Error::Command(Box::new(e))
}
