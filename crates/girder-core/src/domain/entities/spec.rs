use std::fmt;
use std::sync::Arc;

use crate::domain::{
    entities::{
        builder::Builder,
        scaffold::Value,
        shell::{Assembler, Fields, Shell},
    },
    error::DomainError,
};

/// Anything that can be replayed into a builder through the include family.
pub trait Program<C> {
    fn run(&self, builder: &mut Builder<'_, C>);
}

type BuilderFn<C> = Arc<dyn Fn(&mut Builder<'_, C>) + Send + Sync>;

/// Reusable, context-parameterised description of how to build a `T`.
///
/// A spec holds no state of its own: connecting it to two contexts yields
/// two unrelated shells.
pub struct Spec<C, T> {
    entity: &'static str,
    program: BuilderFn<C>,
    assemble: Assembler<T>,
    required: Arc<[&'static str]>,
}

impl<C, T: Value> Spec<C, T> {
    pub fn new<P, A>(entity: &'static str, program: P, assemble: A) -> Self
    where
        P: Fn(&mut Builder<'_, C>) + Send + Sync + 'static,
        A: Fn(&Fields) -> Result<T, DomainError> + Send + Sync + 'static,
    {
        Self {
            entity,
            program: Arc::new(program),
            assemble: Arc::new(assemble),
            required: Arc::from(Vec::new()),
        }
    }

    /// Declare fields that must be set before the children are resolved.
    pub fn require(mut self, fields: &[&'static str]) -> Self {
        self.required = Arc::from(fields);
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn required_fields(&self) -> &[&'static str] {
        &self.required
    }

    /// Run the program against a fresh builder bound to `context`.
    pub fn connect(&self, context: &C) -> Shell<T> {
        let mut builder = Builder::new(context);
        (self.program)(&mut builder);
        builder.into_shell(
            self.entity,
            Arc::clone(&self.required),
            Arc::clone(&self.assemble),
        )
    }
}

impl<C, T> Program<C> for Spec<C, T> {
    fn run(&self, builder: &mut Builder<'_, C>) {
        (self.program)(builder);
    }
}

impl<C, T> Clone for Spec<C, T> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity,
            program: Arc::clone(&self.program),
            assemble: Arc::clone(&self.assemble),
            required: Arc::clone(&self.required),
        }
    }
}

impl<C, T> fmt::Debug for Spec<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("entity", &self.entity)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// A builder program with no assembler of its own; only usable through
/// `include`, `include_with` and `include_for_each`.
pub struct Fragment<C> {
    program: BuilderFn<C>,
}

impl<C> Fragment<C> {
    pub fn new<P>(program: P) -> Self
    where
        P: Fn(&mut Builder<'_, C>) + Send + Sync + 'static,
    {
        Self {
            program: Arc::new(program),
        }
    }
}

impl<C> Program<C> for Fragment<C> {
    fn run(&self, builder: &mut Builder<'_, C>) {
        (self.program)(builder);
    }
}

impl<C> Clone for Fragment<C> {
    fn clone(&self) -> Self {
        Self {
            program: Arc::clone(&self.program),
        }
    }
}

impl<C> fmt::Debug for Fragment<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment").finish_non_exhaustive()
    }
}
