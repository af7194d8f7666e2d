use switchyard_core::errors::*;

#[test]
fn subsystem_errors_convert_into_top_level() {
    let e: SwitchyardError = CompletionError::Disabled {
        reason: "no api key".into(),
    }
    .into();
    assert_eq!(e.kind(), "completion");
    assert!(e.to_string().contains("no api key"));

    let e: SwitchyardError = EmbeddingError::DimensionMismatch {
        expected: 768,
        actual: 3,
    }
    .into();
    assert_eq!(e.kind(), "embedding");

    let e: SwitchyardError = StorageError::SqliteError {
        message: "disk I/O error".into(),
    }
    .into();
    assert_eq!(e.kind(), "storage");

    let e: SwitchyardError = PlanError::NotAPlanDocument.into();
    assert_eq!(e.kind(), "plan");
}

#[test]
fn validation_error_lists_every_violation() {
    let err = ValidationError::new(vec![
        Violation::TableNotAllowed {
            index: 1,
            entity: "orders".into(),
        },
        Violation::OperatorNotAllowed {
            index: 1,
            operator: "!=".into(),
        },
    ]);
    let msg = SwitchyardError::from(err).to_string();
    assert!(msg.starts_with("plan rejected: "));
    assert!(msg.contains("table 'orders' is not allowed"));
    assert!(msg.contains("; "));
    assert!(msg.contains("operator '!=' is not allowed"));
}

#[test]
fn serde_errors_are_serialization_kind() {
    let raw: Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let e: SwitchyardError = raw.unwrap_err().into();
    assert_eq!(e.kind(), "serialization");
}

#[test]
fn timeout_message_names_operation() {
    let e = SwitchyardError::Timeout {
        operation: "classify".into(),
        timeout_ms: 4_000,
    };
    assert_eq!(e.to_string(), "classify timed out after 4000ms");
    assert_eq!(e.kind(), "timeout");
}
