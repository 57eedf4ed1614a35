//! In-memory registry.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use tokio::{sync::Notify, time::Instant};
use tracing::{debug, warn};

use crate::application::{
    ApplicationError,
    ports::Registry,
    registry::{DuplicatePolicy, RegistryPolicy},
};
use crate::domain::{AnyValue, RegistryKey, ShellValidator as validator};
use crate::error::GirderResult;

/// Thread-safe, write-once registry.
///
/// Clones share the same storage, so one registry can be handed to several
/// translations that reference each other's entities.
#[derive(Clone)]
pub struct InMemoryRegistry {
    inner: Arc<RwLock<HashMap<RegistryKey, AnyValue>>>,
    registered: Arc<Notify>,
    policy: RegistryPolicy,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new(policy: RegistryPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            registered: Arc::new(Notify::new()),
            policy,
        }
    }

    pub fn is_empty(&self) -> bool {
        Registry::len(self) == 0
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new(RegistryPolicy::default())
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("keys", &Registry::keys(self))
            .field("policy", &self.policy)
            .finish()
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn put(&self, key: RegistryKey, value: AnyValue) -> GirderResult<()> {
        validator::validate_name(key.name())?;

        {
            let mut inner = self
                .inner
                .write()
                .map_err(|_| ApplicationError::RegistryLockError)?;

            if inner.contains_key(&key) {
                return match self.policy.on_duplicate {
                    DuplicatePolicy::Reject => Err(key.duplicate().into()),
                    DuplicatePolicy::KeepFirst => {
                        warn!(%key, "duplicate registration ignored");
                        Ok(())
                    }
                };
            }
            inner.insert(key.clone(), value);
        }

        debug!(%key, "registered");
        self.registered.notify_waiters();
        Ok(())
    }

    async fn get(&self, key: &RegistryKey) -> GirderResult<AnyValue> {
        validator::validate_name(key.name())?;

        if let Some(value) = self.peek(key)? {
            return Ok(value);
        }
        let Some(limit) = self.policy.lookup_timeout else {
            return Err(key.unresolved().into());
        };

        debug!(%key, timeout_ms = limit.as_millis() as u64, "waiting for registration");
        let deadline = Instant::now() + limit;
        loop {
            // Enable the waiter before checking, so a put landing between the
            // check and the await is not missed.
            let notified = self.registered.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(value) = self.peek(key)? {
                return Ok(value);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.peek(key)?.ok_or_else(|| key.unresolved().into());
            }
        }
    }

    fn peek(&self, key: &RegistryKey) -> GirderResult<Option<AnyValue>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::RegistryLockError)?;
        Ok(inner.get(key).cloned())
    }

    fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    fn keys(&self) -> Vec<RegistryKey> {
        let mut keys: Vec<_> = self
            .inner
            .read()
            .map(|inner| inner.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort_by_cached_key(|key| key.to_string());
        keys
    }

    fn policy(&self) -> RegistryPolicy {
        self.policy
    }
}
