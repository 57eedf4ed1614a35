//! Per-translation staging over a shared registry.
//!
//! Puts land in a private layer; reads see the shared registry first, then
//! the layer. Nothing reaches the shared registry until [`StagedRegistry::commit`],
//! so a translation that fails leaves it exactly as it found it.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::{
    ports::{Registry, SharedRegistry},
    registry::{DuplicatePolicy, InMemoryRegistry, RegistryPolicy},
};
use crate::domain::{AnyValue, RegistryKey};
use crate::error::GirderResult;

pub struct StagedRegistry {
    shared: SharedRegistry,
    staged: InMemoryRegistry,
}

impl StagedRegistry {
    /// Stage on top of `shared`, with the same policy.
    pub fn over(shared: SharedRegistry) -> Self {
        let staged = InMemoryRegistry::new(shared.policy());
        Self { shared, staged }
    }

    /// Number of entries waiting to be committed.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Publish every staged entry into the shared registry, in key order.
    pub async fn commit(&self) -> GirderResult<usize> {
        let keys = self.staged.keys();
        for key in &keys {
            if let Some(value) = self.staged.peek(key)? {
                self.shared.put(key.clone(), value).await?;
            }
        }
        debug!(entries = keys.len(), "committed staged registrations");
        Ok(keys.len())
    }
}

impl std::fmt::Debug for StagedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedRegistry")
            .field("shared", &self.shared.keys())
            .field("staged", &self.staged)
            .finish()
    }
}

#[async_trait]
impl Registry for StagedRegistry {
    async fn put(&self, key: RegistryKey, value: AnyValue) -> GirderResult<()> {
        if self.shared.peek(&key)?.is_some() {
            return match self.shared.policy().on_duplicate {
                DuplicatePolicy::Reject => Err(key.duplicate().into()),
                DuplicatePolicy::KeepFirst => {
                    warn!(%key, "duplicate registration ignored");
                    Ok(())
                }
            };
        }
        self.staged.put(key, value).await
    }

    async fn get(&self, key: &RegistryKey) -> GirderResult<AnyValue> {
        if let Some(value) = self.shared.peek(key)? {
            return Ok(value);
        }
        // Either layer may receive the key while we wait: this translation
        // stages it, or a concurrent one commits it.
        tokio::select! {
            found = self.staged.get(key) => match found {
                Ok(value) => Ok(value),
                Err(err) => self.shared.peek(key)?.ok_or(err),
            },
            Ok(value) = self.shared.get(key) => Ok(value),
        }
    }

    fn peek(&self, key: &RegistryKey) -> GirderResult<Option<AnyValue>> {
        match self.shared.peek(key)? {
            Some(value) => Ok(Some(value)),
            None => self.staged.peek(key),
        }
    }

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn keys(&self) -> Vec<RegistryKey> {
        let mut keys = self.shared.keys();
        keys.extend(self.staged.keys());
        keys.sort_by_cached_key(|key| key.to_string());
        keys.dedup();
        keys
    }

    fn policy(&self) -> RegistryPolicy {
        self.shared.policy()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::domain::DomainError;
    use crate::error::GirderError;

    fn shared(policy: RegistryPolicy) -> SharedRegistry {
        Arc::new(InMemoryRegistry::new(policy))
    }

    fn value(n: u32) -> AnyValue {
        Arc::new(n)
    }

    #[tokio::test]
    async fn puts_stay_private_until_commit() {
        let shared = shared(RegistryPolicy::fail_fast());
        let staged = StagedRegistry::over(Arc::clone(&shared));
        let key = RegistryKey::of::<u32>("build");

        staged.put(key.clone(), value(1)).await.unwrap();
        assert!(staged.get(&key).await.is_ok());
        assert_eq!(shared.len(), 0);
        assert_eq!(staged.pending(), 1);

        assert_eq!(staged.commit().await.unwrap(), 1);
        assert!(shared.peek(&key).unwrap().is_some());
    }

    #[tokio::test]
    async fn dropping_without_commit_discards_everything() {
        let shared = shared(RegistryPolicy::fail_fast());
        {
            let staged = StagedRegistry::over(Arc::clone(&shared));
            staged
                .put(RegistryKey::of::<u32>("build"), value(1))
                .await
                .unwrap();
        }
        assert_eq!(shared.len(), 0);
    }

    #[tokio::test]
    async fn reads_through_to_shared_entries() {
        let shared = shared(RegistryPolicy::fail_fast());
        let key = RegistryKey::of::<u32>("lint");
        shared.put(key.clone(), value(3)).await.unwrap();

        let staged = StagedRegistry::over(Arc::clone(&shared));
        let found = staged.get(&key).await.unwrap();
        assert_eq!(*found.downcast_ref::<u32>().unwrap(), 3);
        assert_eq!(staged.len(), 1);
    }

    #[tokio::test]
    async fn name_taken_in_shared_is_a_duplicate() {
        let shared = shared(RegistryPolicy::fail_fast());
        let key = RegistryKey::of::<u32>("build");
        shared.put(key.clone(), value(1)).await.unwrap();

        let staged = StagedRegistry::over(Arc::clone(&shared));
        let err = staged.put(key, value(2)).await.unwrap_err();
        assert!(matches!(
            err,
            GirderError::Domain(DomainError::DuplicateRegistration { .. })
        ));
    }

    #[tokio::test]
    async fn keep_first_leaves_shared_value_alone() {
        let policy = RegistryPolicy::fail_fast().with_duplicates(DuplicatePolicy::KeepFirst);
        let shared = shared(policy);
        let key = RegistryKey::of::<u32>("build");
        shared.put(key.clone(), value(1)).await.unwrap();

        let staged = StagedRegistry::over(Arc::clone(&shared));
        staged.put(key.clone(), value(2)).await.unwrap();
        staged.commit().await.unwrap();

        let kept = shared.peek(&key).unwrap().unwrap();
        assert_eq!(*kept.downcast_ref::<u32>().unwrap(), 1);
    }

    #[tokio::test]
    async fn waiting_lookup_sees_a_concurrent_commit() {
        let shared = shared(RegistryPolicy::blocking(Duration::from_secs(5)));
        let key = RegistryKey::of::<u32>("late");

        let waiter = {
            let staged = StagedRegistry::over(Arc::clone(&shared));
            let key = key.clone();
            tokio::spawn(async move { staged.get(&key).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        shared.put(key, value(9)).await.unwrap();

        let found = waiter.await.unwrap().unwrap();
        assert_eq!(*found.downcast_ref::<u32>().unwrap(), 9);
    }
}
