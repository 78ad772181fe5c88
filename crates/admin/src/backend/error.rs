//! Backend client errors.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the REST backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {detail}")]
    Api { status: u16, detail: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request URL could not be built from the configured base.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// The human-readable message supplied by the backend, if any.
    ///
    /// Transport and parse failures have no server detail.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } | Self::NotFound(detail) if !detail.is_empty() => {
                Some(detail)
            }
            _ => None,
        }
    }

    /// The server detail, or `fallback` when there is none.
    #[must_use]
    pub fn detail_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.detail().unwrap_or(fallback)
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// FastAPI error body: `{"detail": "..."}` or `{"detail": [{"msg": ...}]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    msg: String,
    #[serde(default)]
    loc: Vec<serde_json::Value>,
}

impl ValidationIssue {
    /// `field: message`, using the last path element of `loc` as the field.
    fn describe(&self) -> String {
        let field = self.loc.last().and_then(|segment| match segment {
            serde_json::Value::String(name) if name != "body" => Some(name.as_str()),
            _ => None,
        });
        field.map_or_else(|| self.msg.clone(), |field| format!("{field}: {}", self.msg))
    }
}

/// Extract a readable detail from an error response body.
///
/// Non-JSON bodies are returned trimmed; empty bodies give `None`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: ErrorDetail::Message(message),
        }) => Some(message),
        Ok(ErrorBody {
            detail: ErrorDetail::Validation(issues),
        }) => {
            let joined = issues
                .iter()
                .map(ValidationIssue::describe)
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        Err(_) if body.starts_with('{') || body.starts_with('[') => None,
        Err(_) => Some(body.to_string()),
    }
}
