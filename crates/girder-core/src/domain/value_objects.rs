//! Domain value objects: TypeTag, Name, RegistryKey.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. A
//! [`RegistryKey`] is what a named entity is published under and what a
//! reference scaffold looks up, so both sides must agree on the declared
//! type *and* the name.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::error::DomainError;

// ── TypeTag ──────────────────────────────────────────────────────────────────

/// The declared type half of a registry key.
///
/// Equality and hashing use the `TypeId` only; the name is carried for
/// error messages and logs.
#[derive(Debug, Clone, Copy, Eq)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Unqualified type name, e.g. `Job` for `girder_pipeline::model::Job`.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip module paths while keeping generic arguments readable:
/// `alloc::vec::Vec<my::Job>` becomes `Vec<my::Job>`.
fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

// ── Name ─────────────────────────────────────────────────────────────────────

/// User-supplied name of a uniquely named entity (a job name, a resource
/// address, ...).
///
/// Construction never fails so that builders stay infallible; the registry
/// calls [`Name::validate`] when the name is actually used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0.trim().is_empty() {
            return Err(DomainError::InvalidName {
                name: self.0.clone(),
                reason: "name cannot be empty".into(),
            });
        }
        Ok(())
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for Name {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── RegistryKey ──────────────────────────────────────────────────────────────

/// `(declared type, name)` pair identifying one registry slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    tag: TypeTag,
    name: Name,
}

impl RegistryKey {
    pub fn new(tag: TypeTag, name: impl Into<Name>) -> Self {
        Self {
            tag,
            name: name.into(),
        }
    }

    /// Key for a value of type `T` registered as `name`.
    pub fn of<T: Any>(name: impl Into<Name>) -> Self {
        Self::new(TypeTag::of::<T>(), name)
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn unresolved(&self) -> DomainError {
        DomainError::UnresolvedReference {
            type_name: self.tag.name().to_string(),
            name: self.name.to_string(),
        }
    }

    pub fn duplicate(&self) -> DomainError {
        DomainError::DuplicateRegistration {
            type_name: self.tag.name().to_string(),
            name: self.name.to_string(),
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag, self.name)
    }
}
