//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_PREVIOUS_ID: &str = "previous_id";
pub const FIELD_PROVENANCE: &str = "provenance";

// Collection sizes
pub const FIELD_ROWS_READ: &str = "rows_read";
pub const FIELD_ROWS_REJECTED: &str = "rows_rejected";
pub const FIELD_RECORD_COUNT: &str = "record_count";

// Rejection reason key (one warning per reason)
pub const FIELD_REJECT_REASON: &str = "reason";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
