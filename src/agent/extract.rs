//! Recovers an [`Intent`] from free-form model output.
//!
//! Recognition is liberal: the object may be wrapped in prose or code fences
//! and may use single quotes and `None`. Validation is strict: whatever is
//! found must parse as JSON, otherwise the raw text and the candidate are
//! returned for diagnosis.

use super::intent::Intent;
use crate::error::{AgentResult, Error};
use tracing::{debug, error};

/// Locate the JSON object in a model response.
///
/// Takes everything from the first `{` to the last `}`; if there is no such
/// span, the first line that is itself wrapped in braces.
pub fn locate_candidate(raw: &str) -> Option<&str> {
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            return Some(&raw[start..=end]);
        }
    }

    raw.lines()
        .map(str::trim)
        .find(|line| line.starts_with('{') && line.ends_with('}'))
}

/// Rewrite the literal dialect some models answer in into JSON:
/// single quotes become double quotes and `None` becomes `null`.
pub fn normalize_candidate(candidate: &str) -> String {
    candidate.replace('\'', "\"").replace("None", "null")
}

/// Extract the intent from a raw model response
pub fn extract_intent(raw: &str) -> AgentResult<Intent> {
    let Some(candidate) = locate_candidate(raw) else {
        error!("No JSON object in model response: {}", raw);
        return Err(Error::Parse {
            reason: "no JSON object found".to_string(),
            raw: raw.to_string(),
            candidate: None,
        });
    };

    // Strict JSON is taken as-is so apostrophes inside values survive
    if let Ok(intent) = serde_json::from_str::<Intent>(candidate) {
        debug!("Parsed intent: {:?}", intent);
        return Ok(intent);
    }

    let normalized = normalize_candidate(candidate);
    match serde_json::from_str::<Intent>(&normalized) {
        Ok(intent) => {
            debug!("Parsed intent after normalization: {:?}", intent);
            Ok(intent)
        }
        Err(e) => {
            error!("JSON parse error: {}", e);
            error!("Raw response: {}", raw);
            error!("Extracted JSON: {}", normalized);
            Err(Error::Parse {
                reason: e.to_string(),
                raw: raw.to_string(),
                candidate: Some(normalized),
            })
        }
    }
}
