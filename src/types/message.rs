//! Wire messages exchanged between the client context and the resolver.
//!
//! The shapes mirror the JSON the two contexts exchange:
//!
//! - client → resolver: `{"action": "fetchPreview", "url": "..."}`
//! - resolver → client: `{"data": {...}, "error": "..."}` (`error` optional)
//! - settings surface → client: `{"action": "settingsChanged", "settings": {...}}`

use serde::{Deserialize, Serialize};

use super::record::PreviewRecord;
use super::settings::Settings;

/// Request sent to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PreviewRequest {
    /// Resolve (or look up) the preview for `url`.
    FetchPreview { url: String },
}

impl PreviewRequest {
    /// Build a `fetchPreview` request.
    pub fn fetch(url: impl Into<String>) -> Self {
        PreviewRequest::FetchPreview { url: url.into() }
    }

    /// The URL this request is about.
    pub fn url(&self) -> &str {
        match self {
            PreviewRequest::FetchPreview { url } => url,
        }
    }
}

/// Resolver reply to a [`PreviewRequest`].
///
/// `data` is always present; the resolver substitutes a fallback record on
/// failure. `error` is diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub data: PreviewRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreviewResponse {
    /// Successful response.
    pub fn ok(data: PreviewRecord) -> Self {
        Self { data, error: None }
    }

    /// Fallback response carrying a diagnostic.
    pub fn with_error(data: PreviewRecord, error: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
        }
    }
}

/// Messages delivered to a client context by other surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Settings were edited; apply them to subsequent hovers.
    SettingsChanged { settings: Settings },
}
