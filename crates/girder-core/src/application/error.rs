//! Application layer errors.
//!
//! These errors represent failures in orchestration, not in the document
//! being translated. Document errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while scheduling resolution or touching the registry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A resolution task panicked or was cancelled outside of a group abort.
    #[error("Resolution task failed: {reason}")]
    TaskFailed { reason: String },

    /// Registry access failed (lock poisoned).
    #[error("Registry lock poisoned")]
    RegistryLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TaskFailed { reason } => vec![
                format!("A task stopped unexpectedly: {}", reason),
                "An assembler probably panicked; check its input handling".into(),
            ],
            Self::RegistryLockError => vec![
                "A thread panicked while holding the registry".into(),
                "Start a fresh translation; the shared registry is unusable".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Internal
    }
}
