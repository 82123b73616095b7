use thiserror::Error;

/// Errors surfaced by the job repository
///
/// A missing job is not an error: lookups return `Option`.
#[derive(Debug, Error)]
pub enum JobError {
    /// The store rejected a statement or could not be reached
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// A stored row could not be turned into a valid job
    #[error("Data integrity error on field '{field}': {reason}")]
    DataIntegrity { field: &'static str, reason: String },
}

impl JobError {
    pub(crate) fn integrity(field: &'static str, reason: impl Into<String>) -> Self {
        JobError::DataIntegrity {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JobError>;
