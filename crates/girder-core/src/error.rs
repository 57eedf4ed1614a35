//! Unified error handling for Girder Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with categories and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Girder Core operations.
///
/// Cloneable because a scaffold memoises its failure alongside its value:
/// every holder asking again receives the same error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GirderError {
    /// Errors from the domain layer (missing fields, unresolved names, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (task and registry failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl GirderError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Conflict => ErrorCategory::Conflict,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// Translation either succeeds or fails as a whole; nothing is retried.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

/// Convenient result type alias.
pub type GirderResult<T> = Result<T, GirderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_message_is_passed_through() {
        let err: GirderError = DomainError::missing("Job", "image").into();
        assert_eq!(err.to_string(), "Job is missing the image property");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_retryable());
    }

    #[test]
    fn categories_follow_layer() {
        let missing: GirderError = DomainError::UnresolvedReference {
            type_name: "Job".into(),
            name: "lint".into(),
        }
        .into();
        assert_eq!(missing.category(), ErrorCategory::NotFound);

        let lock: GirderError = ApplicationError::RegistryLockError.into();
        assert_eq!(lock.category(), ErrorCategory::Internal);
    }

    #[test]
    fn wrapped_child_keeps_its_suggestions() {
        let child: GirderError = DomainError::UnresolvedReference {
            type_name: "Job".into(),
            name: "lint".into(),
        }
        .into();
        let wrapped: GirderError = DomainError::missing_because("Pipeline", "jobs", child.clone()).into();
        assert_eq!(wrapped.to_string(), "Pipeline is missing the jobs property");
        assert_eq!(wrapped.category(), ErrorCategory::Validation);
        assert_eq!(wrapped.suggestions(), child.suggestions());
    }
}
