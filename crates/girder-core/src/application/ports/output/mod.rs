//! Driven (output) ports.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::registry::RegistryPolicy;
use crate::domain::{AnyValue, RegistryKey};
use crate::error::GirderResult;

/// Port for the store named values are published into.
///
/// Implemented by:
/// - `InMemoryRegistry` (one per translation by default)
///
/// ## Contract
///
/// - A key is written at most once; what a second `put` does depends on
///   [`RegistryPolicy::on_duplicate`], but it never overwrites
/// - `get` either waits for the key (up to the lookup timeout) or fails
///   with `UnresolvedReference`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Publish `value` under `key` and wake any waiting lookups.
    async fn put(&self, key: RegistryKey, value: AnyValue) -> GirderResult<()>;

    /// Look up `key`, waiting for it according to the policy.
    async fn get(&self, key: &RegistryKey) -> GirderResult<AnyValue>;

    /// Non-blocking lookup.
    fn peek(&self, key: &RegistryKey) -> GirderResult<Option<AnyValue>>;

    fn len(&self) -> usize;

    /// Registered keys, sorted by their display form.
    fn keys(&self) -> Vec<RegistryKey>;

    fn policy(&self) -> RegistryPolicy;
}

/// Registries are shared between concurrently resolving branches.
pub type SharedRegistry = Arc<dyn Registry>;
