use thiserror::Error;

/// Errors surfaced by the RSVP core.
#[derive(Error, Debug)]
pub enum RsvpError {
    /// A submission failed validation. Nothing is written.
    #[error("{0}")]
    Validation(String),

    /// The target record vanished between listing and the operation.
    /// Non-fatal for operators; the guest list should be refreshed.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The embedded guest array is shorter than the view expected,
    /// e.g. a concurrent deletion got there first. Surfaced to users
    /// the same way as a missing record.
    #[error("guest index {index} out of range for record {record}")]
    IndexOutOfRange { record: String, index: usize },

    /// Another operation already holds the per-record lock.
    #[error("another operation is in progress for record {0}")]
    Busy(String),

    /// Transport or backend failure. Never retried by the core.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}
