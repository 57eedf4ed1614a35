//! Registry policy, the default in-memory registry and per-translation staging.

mod memory;
mod staged;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use memory::InMemoryRegistry;
pub use staged::StagedRegistry;

/// How long a lookup waits for a name that has not been registered yet.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// What a second `put` for an existing key does. Neither variant overwrites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateRegistration`.
    #[default]
    Reject,
    /// Keep the first value and log the second write.
    KeepFirst,
}

/// Lookup and write semantics of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryPolicy {
    /// `Some(d)`: a lookup waits up to `d` for the key. `None`: fail fast.
    pub lookup_timeout: Option<Duration>,
    pub on_duplicate: DuplicatePolicy,
}

impl RegistryPolicy {
    pub fn blocking(timeout: Duration) -> Self {
        Self {
            lookup_timeout: Some(timeout),
            on_duplicate: DuplicatePolicy::default(),
        }
    }

    pub fn fail_fast() -> Self {
        Self {
            lookup_timeout: None,
            on_duplicate: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicates(mut self, on_duplicate: DuplicatePolicy) -> Self {
        self.on_duplicate = on_duplicate;
        self
    }
}

impl Default for RegistryPolicy {
    fn default() -> Self {
        Self::blocking(DEFAULT_LOOKUP_TIMEOUT)
    }
}
