//! Scaffold resolution.
//!
//! Per composite node:
//!
//! 1. validate declared fields and the registered name
//! 2. fan out: every non-literal child resolves in its own task
//! 3. join; the first failure aborts the rest of the group
//! 4. assemble from the (memoised) child values
//! 5. publish under the registered name, if any, then return
//!
//! A failure inside a required field is reported as that field missing on
//! the parent, with the child's error kept as its source.
//!
//! Step 2 is what makes forward references work: a branch that registers a
//! name gets to run while another branch is parked on a lookup of it.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::{FutureExt, future::BoxFuture};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, trace};

use crate::application::{ApplicationError, ports::SharedRegistry};
use crate::domain::{
    DomainError, RegistryKey, ShellValidator as validator, TypeTag,
    entities::{
        scaffold::{AnyValue, ErasedScaffold, Resolvable, Scaffold, ScaffoldKind, Value},
        shell::{FieldSlot, Fields, ResolvedField, Shell},
    },
};
use crate::error::{GirderError, GirderResult};

impl<T: Value> Scaffold<T> {
    /// Resolve this node against `registry`.
    ///
    /// The outcome is cached on the node: later calls, from any holder,
    /// return the same value or the same error without redoing any work.
    ///
    /// The cache belongs to the node, not to a registry. Once settled, a node
    /// returns its first outcome whatever registry a later call passes in;
    /// connect the spec again to resolve against a different one.
    pub async fn resolve(&self, registry: &SharedRegistry) -> GirderResult<T> {
        self.node
            .memo
            .get_or_init(|| resolve_kind(&self.node.kind, registry))
            .await
            .clone()
    }
}

/// Resolve `root` in its own task, so a panicking assembler surfaces as
/// [`ApplicationError::TaskFailed`] exactly as it does for a child.
pub(crate) async fn resolve_detached<T: Value>(root: Scaffold<T>, registry: SharedRegistry) -> GirderResult<T> {
    let mut group = JoinSet::new();
    group.spawn(async move { root.resolve(&registry).await });
    match group.join_next().await {
        Some(Ok(outcome)) => outcome,
        Some(Err(err)) => Err(task_failed(err).into()),
        None => Err(ApplicationError::TaskFailed {
            reason: "root task was never scheduled".into(),
        }
        .into()),
    }
}

fn task_failed(err: JoinError) -> ApplicationError {
    ApplicationError::TaskFailed {
        reason: err.to_string(),
    }
}

impl<V: Value> Resolvable for Scaffold<V> {
    fn resolve_any<'a>(
        &'a self,
        registry: &'a SharedRegistry,
    ) -> BoxFuture<'a, GirderResult<AnyValue>> {
        async move {
            let value = self.resolve(registry).await?;
            Ok(Arc::new(value) as AnyValue)
        }
        .boxed()
    }

    fn is_literal(&self) -> bool {
        Scaffold::is_literal(self)
    }
}

async fn resolve_kind<T: Value>(kind: &ScaffoldKind<T>, registry: &SharedRegistry) -> GirderResult<T> {
    match kind {
        ScaffoldKind::Literal(value) => Ok(value.clone()),
        ScaffoldKind::Reference(key) => resolve_reference(key, registry).await,
        ScaffoldKind::Composite(shell) => resolve_composite(shell, registry).await,
    }
}

async fn resolve_reference<T: Value>(key: &RegistryKey, registry: &SharedRegistry) -> GirderResult<T> {
    trace!(%key, "looking up reference");
    let value = registry.get(key).await?;
    let value = (*value).downcast_ref::<T>().cloned().ok_or_else(|| {
        DomainError::TypeMismatch {
            entity: key.tag().name().to_string(),
            field: key.name().to_string(),
            expected: TypeTag::of::<T>().name().to_string(),
        }
    })?;
    Ok(value)
}

async fn resolve_composite<T: Value>(shell: &Shell<T>, registry: &SharedRegistry) -> GirderResult<T> {
    validator::validate_shell(shell)?;

    fan_out(shell, registry).await?;

    let mut values = HashMap::with_capacity(shell.slots().len());
    for (field, slot) in shell.slots() {
        let resolved = match slot {
            FieldSlot::Single(child) => ResolvedField::Single(
                child
                    .resolve_any(registry)
                    .await
                    .map_err(|err| blame(shell, field, err))?,
            ),
            FieldSlot::Many(children) => {
                let mut items = Vec::with_capacity(children.len());
                for child in children {
                    let item = child
                        .resolve_any(registry)
                        .await
                        .map_err(|err| blame(shell, field, err))?;
                    items.push(item);
                }
                ResolvedField::Many(items)
            }
        };
        values.insert(*field, resolved);
    }

    let fields = Fields::new(shell.entity(), shell.registered_name().cloned(), values);
    let value = shell.assemble(&fields)?;

    if let Some(name) = shell.registered_name() {
        registry
            .put(RegistryKey::of::<T>(name.clone()), Arc::new(value.clone()))
            .await?;
    }
    Ok(value)
}

/// A required field that failed to resolve is missing from `shell`'s point
/// of view; any other field's failure passes through as is.
fn blame<T>(shell: &Shell<T>, field: &str, err: GirderError) -> GirderError {
    if shell.required_fields().iter().any(|required| *required == field) {
        DomainError::missing_because(shell.entity(), field, err).into()
    } else {
        err
    }
}

/// Resolve every non-literal child concurrently and wait for all of them.
async fn fan_out<T>(shell: &Shell<T>, registry: &SharedRegistry) -> GirderResult<()> {
    let pending: Vec<(&'static str, ErasedScaffold)> = shell
        .slots()
        .iter()
        .flat_map(|(field, slot)| slot.iter().map(move |child| (*field, child)))
        .filter(|(_, child)| !child.is_literal())
        .map(|(field, child)| (field, Arc::clone(child)))
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    debug!(entity = shell.entity(), children = pending.len(), "fanning out");
    let mut group = JoinSet::new();
    for (field, child) in pending {
        let registry = Arc::clone(registry);
        group.spawn(async move {
            child
                .resolve_any(&registry)
                .await
                .map(drop)
                .map_err(|err| (field, err))
        });
    }

    while let Some(joined) = group.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err((field, err))) => {
                debug!(entity = shell.entity(), field, error = %err, "child failed; cancelling siblings");
                group.abort_all();
                return Err(blame(shell, field, err));
            }
            Err(err) => {
                group.abort_all();
                return Err(task_failed(err).into());
            }
        }
    }
    Ok(())
}
