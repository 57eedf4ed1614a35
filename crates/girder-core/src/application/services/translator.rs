//! Translator - the entry point.
//!
//! Binds a spec to a context and drives resolution:
//! 1. Connect the spec (runs the builder program)
//! 2. Resolve the root scaffold in its own task, against a staging layer
//!    over the registry
//! 3. On success, commit the staged names and return the finished value

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ports::SharedRegistry,
        registry::{InMemoryRegistry, RegistryPolicy, StagedRegistry},
        services::resolver::resolve_detached,
    },
    domain::{Scaffold, Spec, Value},
    error::GirderResult,
};

/// Turns `(context, spec)` into a finished `T`.
///
/// Holds no state beyond an optional shared registry: every `translate`
/// starts from a fresh registry unless one was supplied with
/// [`Translator::with_registry`].
pub struct Translator<C, T> {
    spec: Spec<C, T>,
    registry: Option<SharedRegistry>,
    policy: RegistryPolicy,
}

impl<C, T: Value> Translator<C, T> {
    pub fn new(spec: Spec<C, T>) -> Self {
        Self {
            spec,
            registry: None,
            policy: RegistryPolicy::default(),
        }
    }

    /// Resolve into `registry` instead of a fresh one, so entities defined by
    /// earlier translations can be referenced.
    pub fn with_registry(mut self, registry: SharedRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Policy for the registries this translator creates. Ignored when a
    /// shared registry was supplied.
    pub fn with_policy(mut self, policy: RegistryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn spec(&self) -> &Spec<C, T> {
        &self.spec
    }

    /// Translate `context`.
    #[instrument(
        skip_all,
        fields(entity = self.spec.entity(), translation = %Uuid::new_v4())
    )]
    pub async fn translate(&self, context: &C) -> GirderResult<T> {
        let registry = match &self.registry {
            Some(shared) => Arc::clone(shared),
            None => Arc::new(InMemoryRegistry::new(self.policy)) as SharedRegistry,
        };
        self.translate_into(context, &registry).await
    }

    /// Translate `context`, publishing named entities into `registry`.
    ///
    /// All or nothing: the names this translation registers reach `registry`
    /// only if the whole translation succeeds.
    pub async fn translate_into(&self, context: &C, registry: &SharedRegistry) -> GirderResult<T> {
        let started = Instant::now();
        let root = Scaffold::from(self.spec.connect(context));
        let staged = Arc::new(StagedRegistry::over(Arc::clone(registry)));

        let outcome = match resolve_detached(root, Arc::clone(&staged) as SharedRegistry).await {
            Ok(value) => staged.commit().await.map(|_| value),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    registered = registry.len(),
                    "Translation completed"
                );
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "Translation failed");
                Err(err)
            }
        }
    }
}

impl<C, T> std::fmt::Debug for Translator<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("spec", &self.spec)
            .field("shared_registry", &self.registry.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}
