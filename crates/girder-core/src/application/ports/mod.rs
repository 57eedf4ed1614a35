//! Application ports (traits) for external dependencies.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the resolver, implemented elsewhere
//!   - `Registry`: write-once store of named, resolved values
//!
//! The default implementation, [`crate::application::registry::InMemoryRegistry`],
//! lives next to the services so a translator can create one on demand.

pub mod output;

pub use output::{Registry, SharedRegistry};

#[cfg(test)]
pub use output::MockRegistry;
