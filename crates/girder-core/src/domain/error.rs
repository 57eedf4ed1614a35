// ============================================================================
// domain/error.rs - RESOLUTION ERROR DOMAIN
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::error::GirderError;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (memoised alongside resolved values)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    /// A required field was never set, or its value failed to resolve.
    ///
    /// In the second case `cause` holds the child's own error.
    #[error("{entity} is missing the {field} property")]
    MissingRequiredField {
        entity: String,
        field: String,
        #[source]
        cause: Option<Arc<GirderError>>,
    },

    #[error("{entity}.{field} holds a value of the wrong type (expected {expected})")]
    TypeMismatch {
        entity: String,
        field: String,
        expected: String,
    },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Raised by domain assemblers that reject an otherwise complete shell.
    #[error("Cannot assemble {entity}: {reason}")]
    AssemblyFailed { entity: String, reason: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("No {type_name} named '{name}' was registered")]
    UnresolvedReference { type_name: String, name: String },

    // ========================================================================
    // Conflict Errors (409-level equivalent)
    // ========================================================================
    #[error("A {type_name} named '{name}' is already registered")]
    DuplicateRegistration { type_name: String, name: String },
}

impl DomainError {
    /// Shorthand for assemblers: `DomainError::assembly("Job", "timeout must be positive")`.
    pub fn assembly(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssemblyFailed {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// A required field that was never set.
    pub fn missing(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            entity: entity.into(),
            field: field.into(),
            cause: None,
        }
    }

    /// A required field whose value could not be resolved.
    pub fn missing_because(entity: impl Into<String>, field: impl Into<String>, cause: GirderError) -> Self {
        Self::MissingRequiredField {
            entity: entity.into(),
            field: field.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { entity, field, cause: None } => vec![
                format!("Set the '{}' field on every {}", field, entity),
                "Fields are checked when the document is resolved, not while it is built".into(),
            ],
            Self::MissingRequiredField { cause: Some(cause), .. } => cause.suggestions(),
            Self::UnresolvedReference { type_name, name } => vec![
                format!("Define a {} named '{}' somewhere in the document", type_name, name),
                "Check the spelling of the referenced name".into(),
                "If the definition is slow to resolve, raise the registry lookup timeout".into(),
            ],
            Self::DuplicateRegistration { type_name, name } => vec![
                format!("Two {} entities are both named '{}'", type_name, name),
                "Rename one of them, or configure the registry to keep the first".into(),
            ],
            Self::TypeMismatch { field, expected, .. } => vec![
                format!("'{}' must hold a {}", field, expected),
                "A list field cannot be read as a single value".into(),
            ],
            Self::InvalidName { .. } => vec!["Names must be non-empty and not only whitespace".into()],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRequiredField { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidName { .. }
            | Self::AssemblyFailed { .. } => ErrorCategory::Validation,
            Self::UnresolvedReference { .. } => ErrorCategory::NotFound,
            Self::DuplicateRegistration { .. } => ErrorCategory::Conflict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
}
