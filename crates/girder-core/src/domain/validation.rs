use crate::domain::{entities::Shell, error::DomainError, value_objects::Name};

/// Centralized domain validation.
///
/// Run by the resolver before a composite fans out, so a missing field is
/// reported before any child work is spawned.
pub struct ShellValidator;

impl ShellValidator {
    pub fn validate_shell<T>(shell: &Shell<T>) -> Result<(), DomainError> {
        shell.validate()?;
        if let Some(name) = shell.registered_name() {
            Self::validate_name(name)?;
        }
        Ok(())
    }

    pub fn validate_name(name: &Name) -> Result<(), DomainError> {
        name.validate()
    }
}
