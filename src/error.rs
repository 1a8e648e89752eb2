//! Structured error types for the podium composition engine.
//!
//! Layout itself never fails: degenerate input produces empty output. The
//! variants below cover the real error sources at the crate boundary: JSON
//! parsing, font registration, resource loading and file I/O.

use thiserror::Error;

/// The unified error type returned by all public podium API functions.
#[derive(Debug, Error)]
pub enum PodiumError {
    /// JSON input failed to parse as a valid design or element tree.
    #[error("Failed to parse design: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// A font could not be parsed or registered.
    #[error("Font error: {0}")]
    Font(String),
    /// An image or SVG resource failed to load.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for PodiumError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the design schema. Check element `type` tags, field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PodiumError::Parse { source: e, hint }
    }
}

/// Failure reported by a resource loader for one asynchronous leaf.
///
/// Cloneable so the same failure can be handed to the readiness tracker and
/// kept on the render node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("failed to decode '{url}': {reason}")]
    Decode { url: String, reason: String },
    #[error("unsupported resource '{0}'")]
    Unsupported(String),
    #[error("failed to read '{url}': {reason}")]
    Io { url: String, reason: String },
}

impl ResourceError {
    pub fn decode(url: &str, reason: impl ToString) -> Self {
        ResourceError::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_schema_hint() {
        let err: PodiumError = serde_json::from_str::<serde_json::Value>("{\"a\": }")
            .map_err(PodiumError::from)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse design"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn resource_error_converts() {
        let err: PodiumError = ResourceError::NotFound("a.png".into()).into();
        assert_eq!(err.to_string(), "resource not found: a.png");
    }
}
