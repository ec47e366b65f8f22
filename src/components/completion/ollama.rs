use crate::components::CompletionProvider;
use crate::config::Config;
use crate::error::{transport_error, AgentResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const SERVICE: &str = "Ollama";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for the Ollama chat endpoint
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    api_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(api_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.ollama_api_url, &config.ollama_model)
    }
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn complete(&self, prompt: &str) -> AgentResult<String> {
        info!("Requesting completion from Ollama model {}", self.model);

        // One user message, no history
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let res = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Failed to send request: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let error_body = res.text().await.unwrap_or_default();
            return Err(transport_error(
                SERVICE,
                &format!("Chat endpoint returned error: Status {status}, Body: {error_body}"),
            ));
        }

        let response: ChatResponse = res
            .json()
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Failed to parse response: {e}")))?;

        debug!("Ollama response: {}", response.message.content);
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "phi:latest",
            messages: vec![ChatMessage {
                role: "user",
                content: "list events",
            }],
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "phi:latest",
                "messages": [{"role": "user", "content": "list events"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_response_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "model": "phi:latest",
            "message": {"role": "assistant", "content": "{\"action\":\"list\"}"},
            "done": true
        }))
        .unwrap();
        assert_eq!(response.message.content, "{\"action\":\"list\"}");

        assert!(serde_json::from_value::<ChatResponse>(json!({"done": true})).is_err());
    }
}
