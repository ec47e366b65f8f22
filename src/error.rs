use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{service} request failed: {message}")]
    #[diagnostic(code(flowpilot::transport))]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("Invalid JSON response from model: {reason}. Response: {raw}{}", candidate_suffix(.candidate))]
    #[diagnostic(
        code(flowpilot::parse),
        help("the model must answer with a single JSON object")
    )]
    Parse {
        reason: String,
        raw: String,
        candidate: Option<String>,
    },

    #[error("Invalid intent: {0}")]
    #[diagnostic(code(flowpilot::validation))]
    Validation(String),

    #[error("Failed to interpret command: {0}")]
    #[diagnostic(code(flowpilot::command))]
    Command(#[source] Box<Error>),

    #[error("Environment error: {0}")]
    #[diagnostic(code(flowpilot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(flowpilot::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(flowpilot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(flowpilot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(flowpilot::other))]
    Other(String),
}

impl Error {
    /// The error that caused a wrapped command failure, or `self` otherwise
    pub fn root(&self) -> &Error {
        match self {
            Error::Command(inner) => inner.root(),
            other => other,
        }
    }
}

fn candidate_suffix(candidate: &Option<String>) -> String {
    match candidate {
        Some(candidate) => format!(". Extracted JSON: {}", candidate),
        None => String::new(),
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AgentResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create transport errors for a named remote service
pub fn transport_error(service: &'static str, message: &str) -> Error {
    Error::Transport {
        service,
        message: message.to_string(),
    }
}

/// Helper to create intent validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_keeps_original_message() {
        let err = Error::Command(Box::new(transport_error("Ollama", "connection refused")));
        assert_eq!(
            err.to_string(),
            "Failed to interpret command: Ollama request failed: connection refused"
        );
        assert!(matches!(err.root(), Error::Transport { service: "Ollama", .. }));
    }

    #[test]
    fn test_parse_error_includes_raw_and_candidate() {
        let err = Error::Parse {
            reason: "expected value at line 1 column 2".to_string(),
            raw: "sure: {oops}".to_string(),
            candidate: Some("{oops}".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("Response: sure: {oops}"));
        assert!(message.contains("Extracted JSON: {oops}"));

        let err = Error::Parse {
            reason: "no JSON object found".to_string(),
            raw: "nothing here".to_string(),
            candidate: None,
        };
        assert!(!err.to_string().contains("Extracted JSON"));
    }
}
