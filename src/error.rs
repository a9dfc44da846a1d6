//! linkpeek error types

/// linkpeek error types
#[derive(Debug, thiserror::Error)]
pub enum LinkPeekError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("relay error ({status}): {message}")]
    RelayStatus { status: u16, message: String },

    #[error("relay returned no content")]
    EmptyPayload,

    // Data errors
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Cross-context protocol errors
    #[error("resolver channel closed")]
    ChannelClosed,

    #[error("resolver dropped the request without responding")]
    NoResponse,
}

impl LinkPeekError {
    /// Whether this error came from a network or channel transport rather
    /// than from bad input or configuration.
    ///
    /// Transport failures are recovered locally by the pipeline: the probe
    /// falls back to the HTML family, the relay to a domain-only record and
    /// the client to a locally synthesized record.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LinkPeekError::Http(_)
                | LinkPeekError::RelayStatus { .. }
                | LinkPeekError::EmptyPayload
                | LinkPeekError::ChannelClosed
                | LinkPeekError::NoResponse
        )
    }
}

/// Result type alias for linkpeek operations
pub type Result<T> = std::result::Result<T, LinkPeekError>;
