//! Deferred, resolvable nodes.
//!
//! A [`Scaffold`] is what a builder produces for every field it accumulates:
//!
//! ```text
//! Scaffold<T>
//! ├── Literal(T)               already has its value
//! ├── Reference(RegistryKey)   looked up by (type, name) at resolution time
//! └── Composite(Shell<T>)      children + assembler (+ optional name)
//! ```
//!
//! The resolution algorithm itself lives in
//! [`crate::application::services::resolver`]; this module only owns the
//! data and the memo cell every node carries.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::application::ports::SharedRegistry;
use crate::domain::{
    entities::shell::Shell,
    value_objects::{Name, RegistryKey},
};
use crate::error::GirderResult;

/// Anything that can flow through the engine: literal field values,
/// assembled domain values, registry entries.
pub trait Value: Any + Clone + Send + Sync {}

impl<T: Any + Clone + Send + Sync> Value for T {}

/// Type-erased resolved value, as stored in the registry and handed to
/// assemblers before downcasting.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// The three node variants.
pub enum ScaffoldKind<T> {
    Literal(T),
    Reference(RegistryKey),
    Composite(Shell<T>),
}

pub(crate) struct ScaffoldNode<T> {
    pub(crate) kind: ScaffoldKind<T>,
    /// Filled exactly once, with success or failure.
    pub(crate) memo: OnceCell<GirderResult<T>>,
}

/// Shared handle to a resolvable node.
///
/// Cloning is cheap and shares the node: however many holders resolve it,
/// the underlying work happens once.
pub struct Scaffold<T> {
    pub(crate) node: Arc<ScaffoldNode<T>>,
}

impl<T> Scaffold<T> {
    fn from_kind(kind: ScaffoldKind<T>) -> Self {
        Self {
            node: Arc::new(ScaffoldNode {
                kind,
                memo: OnceCell::new(),
            }),
        }
    }

    pub fn literal(value: T) -> Self {
        Self::from_kind(ScaffoldKind::Literal(value))
    }

    pub fn reference_to(key: RegistryKey) -> Self {
        Self::from_kind(ScaffoldKind::Reference(key))
    }

    pub fn composite(shell: Shell<T>) -> Self {
        Self::from_kind(ScaffoldKind::Composite(shell))
    }

    pub fn kind(&self) -> &ScaffoldKind<T> {
        &self.node.kind
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.node.kind, ScaffoldKind::Literal(_))
    }

    /// `true` once resolution has finished (successfully or not).
    pub fn is_settled(&self) -> bool {
        self.node.memo.initialized()
    }

    /// Whether two handles share the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl<T: Any> Scaffold<T> {
    /// Forward reference to the `T` registered as `name`.
    pub fn reference(name: impl Into<Name>) -> Self {
        Self::reference_to(RegistryKey::of::<T>(name))
    }
}

impl<T> Clone for Scaffold<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> From<Shell<T>> for Scaffold<T> {
    fn from(shell: Shell<T>) -> Self {
        Self::composite(shell)
    }
}

impl<T> fmt::Debug for Scaffold<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.kind {
            ScaffoldKind::Literal(_) => f.write_str("Scaffold::Literal"),
            ScaffoldKind::Reference(key) => write!(f, "Scaffold::Reference({key})"),
            ScaffoldKind::Composite(shell) => write!(f, "Scaffold::Composite({})", shell.entity()),
        }
    }
}

/// Object-safe view of a `Scaffold<V>` for any `V`, so a shell can hold
/// children of different types side by side.
pub(crate) trait Resolvable: Send + Sync {
    fn resolve_any<'a>(&'a self, registry: &'a SharedRegistry)
    -> BoxFuture<'a, GirderResult<AnyValue>>;

    fn is_literal(&self) -> bool;
}

pub(crate) type ErasedScaffold = Arc<dyn Resolvable>;

pub(crate) fn erase<V: Value>(scaffold: Scaffold<V>) -> ErasedScaffold {
    Arc::new(scaffold)
}
