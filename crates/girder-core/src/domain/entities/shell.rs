use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::{
    entities::scaffold::{AnyValue, ErasedScaffold, Value},
    error::DomainError,
    value_objects::{Name, TypeTag},
};

/// One accumulated field: a scalar slot or a list slot.
#[derive(Clone)]
pub(crate) enum FieldSlot {
    Single(ErasedScaffold),
    Many(Vec<ErasedScaffold>),
}

impl FieldSlot {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    /// Append to this slot, promoting a scalar to the first list element.
    pub(crate) fn append(&mut self, mut items: Vec<ErasedScaffold>) {
        match self {
            Self::Many(existing) => existing.append(&mut items),
            Self::Single(first) => {
                let mut list = Vec::with_capacity(items.len() + 1);
                list.push(first.clone());
                list.append(&mut items);
                *self = Self::Many(list);
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ErasedScaffold> {
        let (single, many) = match self {
            Self::Single(item) => (Some(item), &[][..]),
            Self::Many(items) => (None, items.as_slice()),
        };
        single.into_iter().chain(many.iter())
    }
}

pub(crate) type Slots = HashMap<&'static str, FieldSlot>;

/// Builds the final value from a resolved snapshot.
pub type Assembler<T> = Arc<dyn Fn(&Fields) -> Result<T, DomainError> + Send + Sync>;

/// A builder's snapshot: fields (literal or still deferred) plus the logic to
/// validate and assemble the final value.
pub struct Shell<T> {
    entity: &'static str,
    slots: Slots,
    name: Option<Name>,
    required: Arc<[&'static str]>,
    assemble: Assembler<T>,
}

impl<T> Shell<T> {
    pub(crate) fn new(
        entity: &'static str,
        slots: Slots,
        name: Option<Name>,
        required: Arc<[&'static str]>,
        assemble: Assembler<T>,
    ) -> Self {
        Self {
            entity,
            slots,
            name,
            required,
            assemble,
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Name this shell publishes its value under, if any.
    pub fn registered_name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn required_fields(&self) -> &[&'static str] {
        &self.required
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.slots.contains_key(field)
    }

    /// Number of accumulated entries for `field` (a scalar counts as one).
    pub fn field_len(&self, field: &str) -> Option<usize> {
        self.slots.get(field).map(FieldSlot::len)
    }

    /// Field names, sorted for stable output.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.slots.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Required-field presence check.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.required.iter().find(|field| !self.slots.contains_key(*field)) {
            Some(field) => Err(DomainError::missing(self.entity, *field)),
            None => Ok(()),
        }
    }

    pub(crate) fn slots(&self) -> &Slots {
        &self.slots
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = &ErasedScaffold> {
        self.slots.values().flat_map(FieldSlot::iter)
    }

    pub(crate) fn assemble(&self, fields: &Fields) -> Result<T, DomainError> {
        (self.assemble)(fields)
    }
}

impl<T> fmt::Debug for Shell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("entity", &self.entity)
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .finish()
    }
}

// ── Fields ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) enum ResolvedField {
    Single(AnyValue),
    Many(Vec<AnyValue>),
}

/// Resolved snapshot of a shell, handed to its assembler.
///
/// List fields that were never pushed read as empty; a scalar read through
/// [`Fields::list`] is a one-element list.
pub struct Fields {
    entity: &'static str,
    name: Option<Name>,
    values: HashMap<&'static str, ResolvedField>,
}

impl Fields {
    pub(crate) fn new(
        entity: &'static str,
        name: Option<Name>,
        values: HashMap<&'static str, ResolvedField>,
    ) -> Self {
        Self {
            entity,
            name,
            values,
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn required<V: Value>(&self, field: &str) -> Result<V, DomainError> {
        self.optional(field)?
            .ok_or_else(|| DomainError::missing(self.entity, field))
    }

    pub fn optional<V: Value>(&self, field: &str) -> Result<Option<V>, DomainError> {
        match self.values.get(field) {
            None => Ok(None),
            Some(ResolvedField::Single(value)) => self.downcast(field, value).map(Some),
            Some(ResolvedField::Many(_)) => Err(self.mismatch::<V>(field)),
        }
    }

    pub fn value_or<V: Value>(&self, field: &str, default: V) -> Result<V, DomainError> {
        Ok(self.optional(field)?.unwrap_or(default))
    }

    pub fn list<V: Value>(&self, field: &str) -> Result<Vec<V>, DomainError> {
        match self.values.get(field) {
            None => Ok(Vec::new()),
            Some(ResolvedField::Single(value)) => Ok(vec![self.downcast(field, value)?]),
            Some(ResolvedField::Many(values)) => values
                .iter()
                .map(|value| self.downcast(field, value))
                .collect(),
        }
    }

    fn downcast<V: Value>(&self, field: &str, value: &AnyValue) -> Result<V, DomainError> {
        (**value)
            .downcast_ref::<V>()
            .cloned()
            .ok_or_else(|| self.mismatch::<V>(field))
    }

    fn mismatch<V: Value>(&self, field: &str) -> DomainError {
        DomainError::TypeMismatch {
            entity: self.entity.to_string(),
            field: field.to_string(),
            expected: TypeTag::of::<V>().name().to_string(),
        }
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Fields")
            .field("entity", &self.entity)
            .field("name", &self.name)
            .field("fields", &keys)
            .finish()
    }
}
