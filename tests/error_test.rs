use linkpeek::{LinkPeekError, Result};

#[test]
fn test_error_display() {
    let err = LinkPeekError::InvalidUrl("not a url".to_string());
    assert!(err.to_string().contains("not a url"));
}

#[test]
fn test_relay_status_display() {
    let err = LinkPeekError::RelayStatus {
        status: 503,
        message: "maintenance".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("503"));
    assert!(text.contains("maintenance"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(LinkPeekError::ChannelClosed)
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_json_error_conversion() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }
    assert!(matches!(parse(), Err(LinkPeekError::Json(_))));
}

// ============================================================================
// Transport error classification
// ============================================================================

#[test]
fn transport_errors() {
    assert!(LinkPeekError::Http("connection reset".into()).is_transport());
    assert!(
        LinkPeekError::RelayStatus {
            status: 500,
            message: String::new()
        }
        .is_transport()
    );
    assert!(LinkPeekError::EmptyPayload.is_transport());
    assert!(LinkPeekError::ChannelClosed.is_transport());
    assert!(LinkPeekError::NoResponse.is_transport());
}

#[test]
fn non_transport_errors() {
    assert!(!LinkPeekError::InvalidUrl("x".into()).is_transport());
    assert!(!LinkPeekError::Configuration("bad".into()).is_transport());
}
