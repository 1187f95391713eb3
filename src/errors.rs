use thiserror::Error;

/// Errors that can occur while resolving and locating function sources.
///
/// Misses (module or function not found) are not errors; they are reported
/// through [`crate::types::LookupOutcome`].
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("malformed reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("source tree not found: {path}")]
    TreeNotFound { path: String },

    #[error("invalid job id '{job_id}'")]
    InvalidJobId { job_id: String },

    #[error("lookup cancelled")]
    Cancelled,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LocateError {
    pub(crate) fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        Self::MalformedReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results using `LocateError`.
pub type Result<T> = std::result::Result<T, LocateError>;
