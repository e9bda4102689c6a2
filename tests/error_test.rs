use whatflower::{ErrorKind, PipelineError, Result, WhatFlowerError};

#[test]
fn test_error_display() {
    let err = WhatFlowerError::Model("labels.txt is empty".to_string());
    assert!(err.to_string().contains("labels.txt"));
}

#[test]
fn test_cancelled_display() {
    assert!(WhatFlowerError::Cancelled.to_string().contains("cancelled"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(WhatFlowerError::Configuration("no classifier".into()))
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Pipeline error categories
// ============================================================================

#[test]
fn model_errors_are_model_kind() {
    assert_eq!(
        WhatFlowerError::Model("bad tensor".into()).kind(),
        Some(ErrorKind::Model)
    );
}

#[test]
fn transport_errors_are_network_kind() {
    assert_eq!(
        WhatFlowerError::Network("connection reset".into()).kind(),
        Some(ErrorKind::Network)
    );
    assert_eq!(
        WhatFlowerError::Http {
            status: 503,
            message: "unavailable".into()
        }
        .kind(),
        Some(ErrorKind::Network)
    );
}

#[test]
fn payload_errors_are_parse_kind() {
    assert_eq!(
        WhatFlowerError::Parse("missing query".into()).kind(),
        Some(ErrorKind::Parse)
    );
    let json = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    assert_eq!(WhatFlowerError::from(json).kind(), Some(ErrorKind::Parse));
}

#[test]
fn local_errors_have_no_kind() {
    assert_eq!(WhatFlowerError::Configuration("x".into()).kind(), None);
    assert_eq!(WhatFlowerError::Cancelled.kind(), None);
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "daisy.jpg");
    assert_eq!(WhatFlowerError::from(io).kind(), None);
}

#[test]
fn error_kind_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&ErrorKind::Network).unwrap(), "\"network\"");
    let kind: ErrorKind = serde_json::from_str("\"parse\"").unwrap();
    assert_eq!(kind, ErrorKind::Parse);
}

#[test]
fn pipeline_error_display_names_kind() {
    let err = PipelineError::new(ErrorKind::Network, "timed out");
    let shown = err.to_string();
    assert!(shown.contains("network"), "got {shown}");
    assert!(shown.contains("timed out"), "got {shown}");
}
