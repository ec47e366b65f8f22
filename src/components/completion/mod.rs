#[cfg(feature = "gemini")]
mod gemini;
mod ollama;

#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use super::CompletionProvider;
use crate::config::{CompletionProviderKind, Config};
use crate::error::AgentResult;
use std::sync::Arc;

/// Build the completion provider selected in the configuration
pub fn provider_from_config(config: &Config) -> AgentResult<Arc<dyn CompletionProvider>> {
    match config.completion_provider {
        CompletionProviderKind::Ollama => Ok(Arc::new(OllamaClient::from_config(config))),
        #[cfg(feature = "gemini")]
        CompletionProviderKind::Gemini => Ok(Arc::new(GeminiClient::from_config(config)?)),
        #[cfg(not(feature = "gemini"))]
        CompletionProviderKind::Gemini => Err(crate::error::config_error(
            "the gemini provider requires building with the `gemini` feature",
        )),
    }
}
