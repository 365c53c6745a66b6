//! Job failure classification.

use shopnotify_core::error::AppError;

/// Error from a detection job run
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, never retried
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, retried by the runner
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Classify a failed domain query. Store failures are worth retrying.
    pub fn query(context: &str, err: AppError) -> Self {
        if err.is_persistence() {
            Self::Transient(format!("{context}: {err}"))
        } else {
            Self::Internal(err)
        }
    }

    /// Whether the runner should try again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Permanent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_query_failure_is_transient() {
        let err = JobExecutionError::query("loading carts", AppError::persistence("down"));
        assert!(matches!(err, JobExecutionError::Transient(_)));
        assert!(err.is_retryable());
        assert!(!JobExecutionError::Permanent("bad".into()).is_retryable());
    }
}
