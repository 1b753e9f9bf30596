use crate::normalize::RejectReason;
use celldelta_core_types::{RunContext, RunId, TraceId};
use thiserror::Error;

/// Result type alias using CellDeltaError
pub type Result<T> = std::result::Result<T, CellDeltaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events, CLI output
/// and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Row level (recovered locally, never aborts a run)
    RowRejected,

    // Input
    InvalidInput,
    SourceUnreadable,

    // Snapshot construction
    EmptySnapshot,
    NotCanonical,
    IntegrityViolation,

    // Store
    StoreUnavailable,
    SnapshotNotFound,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::RowRejected => "ERR_ROW_REJECTED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::SourceUnreadable => "ERR_SOURCE_UNREADABLE",
            ExErrorKind::EmptySnapshot => "ERR_EMPTY_SNAPSHOT",
            ExErrorKind::NotCanonical => "ERR_NOT_CANONICAL",
            ExErrorKind::IntegrityViolation => "ERR_INTEGRITY_VIOLATION",
            ExErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ExErrorKind::SnapshotNotFound => "ERR_SNAPSHOT_NOT_FOUND",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind halts the run that raised it
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExErrorKind::RowRejected)
    }
}

/// Canonical structured error type
///
/// Structured representation of errors with classification fields for
/// programmatic handling and context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    snapshot_id: Option<String>,
    row_index: Option<usize>,
    run_id: Option<RunId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            snapshot_id: None,
            row_index: None,
            run_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add snapshot ID context
    pub fn with_snapshot_id(mut self, id: impl Into<String>) -> Self {
        self.snapshot_id = Some(id.into());
        self
    }

    /// Add input row context
    pub fn with_row_index(mut self, row_index: usize) -> Self {
        self.row_index = Some(row_index);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Tag with the run that failed, and its outer trace if one was given
    pub fn in_run(mut self, ctx: &RunContext) -> Self {
        self.run_id = Some(ctx.run_id.clone());
        self.trace_id = ctx.trace_id.clone();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the snapshot ID context, if any
    pub fn snapshot_id(&self) -> Option<&str> {
        self.snapshot_id.as_deref()
    }

    /// Get the input row context, if any
    pub fn row_index(&self) -> Option<usize> {
        self.row_index
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(snapshot_id) = &self.snapshot_id {
            write!(f, " (snapshot_id: {})", snapshot_id)?;
        }
        if let Some(row_index) = self.row_index {
            write!(f, " (row: {})", row_index)?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        if let Some(trace_id) = &self.trace_id {
            write!(f, " (trace_id: {})", trace_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for celldelta operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellDeltaError {
    // ===== Row level =====
    /// A single raw row could not be turned into a valid record
    #[error("Row {row_index} rejected: {reason}")]
    RowRejected {
        row_index: usize,
        reason: RejectReason,
    },

    // ===== Input =====
    /// The raw input could not be read at all
    #[error("Source unreadable ({source_descriptor}): {message}")]
    SourceUnreadable {
        source_descriptor: String,
        message: String,
    },

    // ===== Snapshot construction =====
    /// No valid record survived normalization, scope and deduplication
    #[error("Empty snapshot: {rows_read} rows read, {rows_rejected} rejected, {rows_filtered} out of scope")]
    EmptySnapshot {
        rows_read: usize,
        rows_rejected: usize,
        rows_filtered: usize,
    },

    /// Builder input is not strictly ascending by identity key
    #[error("Records are not in canonical order at position {position}: {message}")]
    NotCanonical { position: usize, message: String },

    /// Stored snapshot bytes do not hash to their snapshot id
    #[error("Snapshot {snapshot_id} failed integrity check (content hashes to {computed})")]
    IntegrityViolation {
        snapshot_id: String,
        computed: String,
    },

    // ===== Store =====
    /// The snapshot store could not serve the request
    #[error("Snapshot store unavailable during {op}: {message}")]
    StoreUnavailable { op: String, message: String },

    /// A snapshot id is unknown to the store
    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound { snapshot_id: String },

    // ===== Configuration =====
    /// Invalid configuration value
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CellDeltaError {
    /// Whether this error halts the run (everything except row rejections)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CellDeltaError::RowRejected { .. })
    }
}

/// Conversion from CellDeltaError to ExError
impl From<CellDeltaError> for ExError {
    fn from(err: CellDeltaError) -> Self {
        match err {
            CellDeltaError::RowRejected { row_index, reason } => {
                ExError::new(ExErrorKind::RowRejected)
                    .with_op("normalize")
                    .with_row_index(row_index)
                    .with_message(format!("Row rejected: {}", reason))
            }

            CellDeltaError::SourceUnreadable {
                source_descriptor,
                message,
            } => ExError::new(ExErrorKind::SourceUnreadable)
                .with_op("read_source")
                .with_message(format!("{}: {}", source_descriptor, message)),

            CellDeltaError::EmptySnapshot {
                rows_read,
                rows_rejected,
                rows_filtered,
            } => {
                let detail = if rows_read == 0 {
                    "source contained no rows"
                } else if rows_rejected == rows_read {
                    "every row was rejected"
                } else {
                    "every record was outside the ingest scope"
                };
                ExError::new(ExErrorKind::EmptySnapshot)
                    .with_op("build_snapshot")
                    .with_message(format!(
                        "No valid records ({}; {} read, {} rejected, {} out of scope)",
                        detail, rows_read, rows_rejected, rows_filtered
                    ))
            }

            CellDeltaError::NotCanonical { position, message } => {
                ExError::new(ExErrorKind::NotCanonical)
                    .with_op("build_snapshot")
                    .with_row_index(position)
                    .with_message(message)
            }

            CellDeltaError::IntegrityViolation {
                snapshot_id,
                computed,
            } => ExError::new(ExErrorKind::IntegrityViolation)
                .with_op("restore_snapshot")
                .with_snapshot_id(snapshot_id)
                .with_message(format!("Content hashes to {}", computed)),

            CellDeltaError::StoreUnavailable { op, message } => {
                ExError::new(ExErrorKind::StoreUnavailable)
                    .with_op(op)
                    .with_message(message)
            }

            CellDeltaError::SnapshotNotFound { snapshot_id } => {
                ExError::new(ExErrorKind::SnapshotNotFound)
                    .with_snapshot_id(snapshot_id)
                    .with_message("Snapshot not found")
            }

            CellDeltaError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            CellDeltaError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            CellDeltaError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to CellDeltaError
impl From<serde_json::Error> for CellDeltaError {
    fn from(err: serde_json::Error) -> Self {
        CellDeltaError::Serialization {
            message: err.to_string(),
        }
    }
}
