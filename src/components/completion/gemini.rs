use crate::components::CompletionProvider;
use crate::config::Config;
use crate::error::{config_error, transport_error, AgentResult};
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as RigGeminiClient;
use tracing::info;

const SERVICE: &str = "Gemini";

/// Completion provider backed by Google Gemini through Rig
#[derive(Clone)]
pub struct GeminiClient {
    client: RigGeminiClient,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: RigGeminiClient::new(api_key),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> AgentResult<Self> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| config_error("GEMINI_API_KEY is required for the gemini provider"))?;
        Ok(Self::new(api_key, &config.gemini_model))
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn complete(&self, prompt: &str) -> AgentResult<String> {
        info!("Using Gemini model: {}", self.model);

        let agent = self.client.agent(&self.model).temperature(0.2).build();

        // Empty history keeps every command independent
        agent
            .chat(prompt.to_string(), Vec::<Message>::new())
            .await
            .map_err(|e| transport_error(SERVICE, &format!("Rig API request failed: {}", e)))
    }
}
