use crate::error::{config_error, env_error, AgentResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Placeholder title for events created without a summary
pub const DEFAULT_EVENT_SUMMARY: &str = "Scheduled by FlowPilot";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_OLLAMA_API_URL: &str = "http://localhost:11434/api/chat";
pub const DEFAULT_OLLAMA_MODEL: &str = "phi:latest";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Location of the optional settings file
pub const CONFIG_FILE: &str = "config/flowpilot.toml";

/// Which text-generation backend interprets commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProviderKind {
    Ollama,
    Gemini,
}

impl std::str::FromStr for CompletionProviderKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            other => Err(config_error(&format!(
                "Unknown completion provider '{}', expected 'ollama' or 'gemini'",
                other
            ))),
        }
    }
}

/// Main configuration structure for the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OAuth bearer token for the Google Calendar API
    pub google_access_token: String,
    /// Calendar that commands operate on
    pub google_calendar_id: String,
    /// Base URL of the Google Calendar REST API
    pub google_calendar_api_url: String,
    /// Backend used for completions
    pub completion_provider: CompletionProviderKind,
    /// Ollama chat endpoint
    pub ollama_api_url: String,
    /// Ollama model name
    pub ollama_model: String,
    /// Gemini API key, only needed for the gemini provider
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// IANA timezone used to anchor relative dates in the prompt
    pub timezone: String,
    /// Title given to created events without a summary
    pub default_event_summary: String,
}

/// Non-secret settings that may live in `config/flowpilot.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub google_calendar_id: Option<String>,
    pub google_calendar_api_url: Option<String>,
    pub completion_provider: Option<CompletionProviderKind>,
    pub ollama_api_url: Option<String>,
    pub ollama_model: Option<String>,
    pub gemini_model: Option<String>,
    pub timezone: Option<String>,
    pub default_event_summary: Option<String>,
}

impl FileConfig {
    /// Read the settings file, returning defaults if it does not exist
    pub fn read(path: &Path) -> AgentResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AgentResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let file = FileConfig::read(Path::new(CONFIG_FILE))?;
        Self::from_sources(file, |key| env::var(key).ok())
    }

    /// Build the configuration from a settings file and an environment lookup.
    /// Environment values win over file values.
    pub fn from_sources<F>(file: FileConfig, lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let google_access_token =
            var("GOOGLE_ACCESS_TOKEN").ok_or_else(|| env_error("GOOGLE_ACCESS_TOKEN"))?;

        let completion_provider = match var("COMPLETION_PROVIDER") {
            Some(value) => value.parse()?,
            None => file
                .completion_provider
                .unwrap_or(CompletionProviderKind::Ollama),
        };

        let gemini_api_key = var("GEMINI_API_KEY");
        if completion_provider == CompletionProviderKind::Gemini && gemini_api_key.is_none() {
            return Err(env_error("GEMINI_API_KEY"));
        }

        let config = Config {
            google_access_token,
            google_calendar_id: var("GOOGLE_CALENDAR_ID")
                .or(file.google_calendar_id)
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            google_calendar_api_url: var("GOOGLE_CALENDAR_API_URL")
                .or(file.google_calendar_api_url)
                .unwrap_or_else(|| DEFAULT_CALENDAR_API_URL.to_string()),
            completion_provider,
            ollama_api_url: var("OLLAMA_API_URL")
                .or(file.ollama_api_url)
                .unwrap_or_else(|| DEFAULT_OLLAMA_API_URL.to_string()),
            ollama_model: var("OLLAMA_MODEL")
                .or(file.ollama_model)
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            gemini_api_key,
            gemini_model: var("GEMINI_MODEL")
                .or(file.gemini_model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            timezone: var("TIMEZONE")
                .or(file.timezone)
                .unwrap_or_else(|| String::from("UTC")),
            default_event_summary: var("DEFAULT_EVENT_SUMMARY")
                .or(file.default_event_summary)
                .unwrap_or_else(|| DEFAULT_EVENT_SUMMARY.to_string()),
        };

        // Fail early on a timezone the prompt builder could not use
        config.tz()?;

        Ok(config)
    }

    /// Parsed configured timezone
    pub fn tz(&self) -> AgentResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }
}
