//! The accumulator spec programs write into.
//!
//! Setters never fail: required fields and references are checked when the
//! resulting shell is resolved.
//!
//! | Call                     | Scalar field         | List field                 |
//! |--------------------------|----------------------|----------------------------|
//! | `set`                    | last write wins      | replaced by the scalar     |
//! | `push` / `extend`        | promoted to a list   | appended in call order     |
//! | `merge` (from `include`) | other side wins      | other side appended        |

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::domain::{
    entities::{
        scaffold::{ErasedScaffold, Scaffold, Value, erase},
        shell::{Assembler, FieldSlot, Shell, Slots},
        spec::{Program, Spec},
    },
    value_objects::Name,
};

pub struct Builder<'c, C> {
    context: &'c C,
    slots: Slots,
    name: Option<Name>,
}

impl<'c, C> Builder<'c, C> {
    pub fn new(context: &'c C) -> Self {
        Self {
            context,
            slots: Slots::new(),
            name: None,
        }
    }

    /// The ambient context this builder was created for.
    pub fn context(&self) -> &'c C {
        self.context
    }

    // ── scalar and list setters ──────────────────────────────────────────────

    pub fn set<V: Value>(&mut self, field: &'static str, value: V) -> &mut Self {
        self.set_scaffold(field, Scaffold::literal(value))
    }

    pub fn push<V: Value>(&mut self, field: &'static str, value: V) -> &mut Self {
        self.push_scaffold(field, Scaffold::literal(value))
    }

    pub fn extend<V, I>(&mut self, field: &'static str, values: I) -> &mut Self
    where
        V: Value,
        I: IntoIterator<Item = V>,
    {
        let items = values
            .into_iter()
            .map(|value| erase(Scaffold::literal(value)))
            .collect();
        self.append(field, items)
    }

    /// Nested spec connected against this builder's context.
    pub fn set_spec<V: Value>(&mut self, field: &'static str, spec: &Spec<C, V>) -> &mut Self {
        let shell = spec.connect(self.context);
        self.set_scaffold(field, Scaffold::from(shell))
    }

    pub fn push_spec<V: Value>(&mut self, field: &'static str, spec: &Spec<C, V>) -> &mut Self {
        let shell = spec.connect(self.context);
        self.push_scaffold(field, Scaffold::from(shell))
    }

    /// Forward reference to the `V` registered as `name`.
    pub fn set_ref<V: Value>(&mut self, field: &'static str, name: impl Into<Name>) -> &mut Self {
        self.set_scaffold(field, Scaffold::<V>::reference(name))
    }

    pub fn push_ref<V: Value>(&mut self, field: &'static str, name: impl Into<Name>) -> &mut Self {
        self.push_scaffold(field, Scaffold::<V>::reference(name))
    }

    pub fn set_scaffold<V: Value>(&mut self, field: &'static str, scaffold: Scaffold<V>) -> &mut Self {
        self.slots.insert(field, FieldSlot::Single(erase(scaffold)));
        self
    }

    pub fn push_scaffold<V: Value>(&mut self, field: &'static str, scaffold: Scaffold<V>) -> &mut Self {
        self.append(field, vec![erase(scaffold)])
    }

    /// Publish the assembled value under `name` so references can find it.
    pub fn register_as(&mut self, name: impl Into<Name>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    // ── include family ───────────────────────────────────────────────────────

    /// Replay `program` against this builder, as if it were written inline.
    pub fn include<P>(&mut self, program: &P) -> &mut Self
    where
        P: Program<C> + ?Sized,
    {
        program.run(self);
        self
    }

    /// Replay `program` against a fork bound to `context`, then merge it back.
    pub fn include_with<C2, P>(&mut self, context: &C2, program: &P) -> &mut Self
    where
        P: Program<C2> + ?Sized,
    {
        let mut fork = self.fork(context);
        program.run(&mut fork);
        self.merge(fork)
    }

    /// `include_with` once per context, in iteration order.
    pub fn include_for_each<C2, I, P>(&mut self, contexts: I, program: &P) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Borrow<C2>,
        P: Program<C2> + ?Sized,
    {
        for context in contexts {
            self.include_with(context.borrow(), program);
        }
        self
    }

    /// An empty builder bound to another context.
    pub fn fork<'d, C2>(&self, context: &'d C2) -> Builder<'d, C2> {
        Builder::new(context)
    }

    /// Fold `other` into this builder: scalars from `other` win, lists from
    /// `other` are appended.
    pub fn merge<C2>(&mut self, other: Builder<'_, C2>) -> &mut Self {
        for (field, slot) in other.slots {
            match slot {
                FieldSlot::Single(_) => {
                    self.slots.insert(field, slot);
                }
                FieldSlot::Many(items) => {
                    self.append(field, items);
                }
            }
        }
        if other.name.is_some() {
            self.name = other.name;
        }
        self
    }

    pub(crate) fn into_shell<T>(
        self,
        entity: &'static str,
        required: Arc<[&'static str]>,
        assemble: Assembler<T>,
    ) -> Shell<T> {
        Shell::new(entity, self.slots, self.name, required, assemble)
    }

    fn append(&mut self, field: &'static str, items: Vec<ErasedScaffold>) -> &mut Self {
        match self.slots.get_mut(field) {
            Some(slot) => slot.append(items),
            None => {
                self.slots.insert(field, FieldSlot::Many(items));
            }
        }
        self
    }
}

impl<C> fmt::Debug for Builder<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.slots.keys().collect();
        fields.sort_unstable();
        f.debug_struct("Builder")
            .field("fields", &fields)
            .field("name", &self.name)
            .finish()
    }
}
