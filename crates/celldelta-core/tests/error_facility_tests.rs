use celldelta_core::errors::{CellDeltaError, ExError, ExErrorKind};
use celldelta_core::RejectReason;
use celldelta_core_types::{RunContext, RunId, TraceId};

#[test]
fn test_snapshot_not_found_verifiable_by_kind() {
    let err = CellDeltaError::SnapshotNotFound {
        snapshot_id: "unknown".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::SnapshotNotFound);
    assert_eq!(ex_err.code(), "ERR_SNAPSHOT_NOT_FOUND");
    assert_eq!(ex_err.snapshot_id(), Some("unknown"));
}

#[test]
fn test_integrity_violation_carries_both_digests() {
    let err = CellDeltaError::IntegrityViolation {
        snapshot_id: "aaa".to_string(),
        computed: "bbb".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::IntegrityViolation);
    assert_eq!(ex_err.snapshot_id(), Some("aaa"));
    assert!(ex_err.message().contains("bbb"));
}

#[test]
fn test_row_rejection_is_not_fatal() {
    let err = CellDeltaError::RowRejected {
        row_index: 12,
        reason: RejectReason::OutOfRange,
    };
    assert!(!err.is_fatal());

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.code(), "ERR_ROW_REJECTED");
    assert_eq!(ex_err.row_index(), Some(12));
    assert!(ex_err.message().contains("out_of_range"));
}

#[test]
fn test_store_unavailable_keeps_operation() {
    let err = CellDeltaError::StoreUnavailable {
        op: "create_if_absent".to_string(),
        message: "database is locked".to_string(),
    };
    assert!(err.is_fatal());

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.op(), Some("create_if_absent"));
    assert_eq!(
        ex_err.to_string(),
        "[ERR_STORE_UNAVAILABLE] in operation 'create_if_absent': database is locked"
    );
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::RowRejected, "ERR_ROW_REJECTED"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::SourceUnreadable, "ERR_SOURCE_UNREADABLE"),
        (ExErrorKind::EmptySnapshot, "ERR_EMPTY_SNAPSHOT"),
        (ExErrorKind::NotCanonical, "ERR_NOT_CANONICAL"),
        (ExErrorKind::IntegrityViolation, "ERR_INTEGRITY_VIOLATION"),
        (ExErrorKind::StoreUnavailable, "ERR_STORE_UNAVAILABLE"),
        (ExErrorKind::SnapshotNotFound, "ERR_SNAPSHOT_NOT_FOUND"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    let mut seen = std::collections::HashSet::new();
    for (kind, code) in kinds {
        assert_eq!(kind.code(), code);
        assert!(seen.insert(code), "duplicate code {}", code);
    }
}

#[test]
fn test_serde_json_error_maps_to_serialization() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: CellDeltaError = json_err.into();
    assert!(matches!(err, CellDeltaError::Serialization { .. }));
}

#[test]
fn test_failed_run_is_tagged_with_its_ids() {
    let ctx = RunContext::with_run_id(RunId::from_string("run-42".to_string()))
        .with_trace_id(TraceId::from_string("sched-7".to_string()));
    let err = CellDeltaError::EmptySnapshot {
        rows_read: 0,
        rows_rejected: 0,
        rows_filtered: 0,
    };

    let ex_err = ExError::from(err).in_run(&ctx);

    assert_eq!(ex_err.run_id().map(RunId::as_str), Some("run-42"));
    assert_eq!(ex_err.trace_id().map(TraceId::as_str), Some("sched-7"));
    let rendered = ex_err.to_string();
    assert!(rendered.starts_with("[ERR_EMPTY_SNAPSHOT]"));
    assert!(rendered.contains("(run_id: run-42)"));
    assert!(rendered.contains("(trace_id: sched-7)"));
}

#[test]
fn test_run_without_trace_renders_run_id_only() {
    let ctx = RunContext::with_run_id(RunId::from_string("run-43".to_string()));
    let ex_err = ExError::from(CellDeltaError::SnapshotNotFound {
        snapshot_id: "abc".to_string(),
    })
    .in_run(&ctx);

    assert!(ex_err.trace_id().is_none());
    assert!(ex_err.to_string().contains("(run_id: run-43)"));
    assert!(!ex_err.to_string().contains("trace_id"));
}
