//! Application layer for Girder.
//!
//! This layer contains:
//! - **Services**: scaffold resolution and the `Translator` entry point
//! - **Ports**: the `Registry` trait resolution publishes into
//! - **Registry**: the default in-memory registry and its policy
//! - **Errors**: Application-specific error types
//!
//! Everything that schedules work or waits lives here; the domain layer
//! only describes what is being built.

pub mod error;
pub mod ports;
pub mod registry;
pub mod services;

pub use services::Translator;

pub use ports::{Registry, SharedRegistry};
pub use registry::{
    DEFAULT_LOOKUP_TIMEOUT, DuplicatePolicy, InMemoryRegistry, RegistryPolicy, StagedRegistry,
};

pub use error::ApplicationError;
