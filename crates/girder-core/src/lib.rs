//! Girder Core - staged resolution of declarative specs.
//!
//! A [`Spec`](domain::Spec) describes how to build a value from a context.
//! Connecting it runs a builder program that accumulates fields, some of
//! them literal, some nested specs, some forward references to entities
//! that are defined elsewhere in the same document. The
//! [`Translator`](application::Translator) then resolves the resulting
//! scaffold tree concurrently, publishing named entities into a registry
//! so that references can find them regardless of where they were defined.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     girder-pipeline / girder-cli        │
//! │   (domain vocabularies, entry points)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │        (Translator, resolver)           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Registry; InMemoryRegistry default)  │
//! └──────────────────┬──────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Data)        │
//! │  (Spec, Builder, Shell, Scaffold, keys) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use girder_core::prelude::*;
//!
//! #[derive(Clone)]
//! struct Job {
//!     name: String,
//!     needs: Vec<Job>,
//! }
//!
//! # async fn run() -> GirderResult<()> {
//! let job = Spec::new(
//!     "Job",
//!     |b: &mut Builder<'_, (&'static str, Option<&'static str>)>| {
//!         let (name, needs) = *b.context();
//!         b.set("name", name.to_string()).register_as(name);
//!         if let Some(needs) = needs {
//!             b.push_ref::<Job>("needs", needs);
//!         }
//!     },
//!     |f| Ok(Job { name: f.required("name")?, needs: f.list("needs")? }),
//! );
//!
//! let built = Translator::new(job).translate(&("build", None)).await?;
//! assert_eq!(built.name, "build");
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DuplicatePolicy, InMemoryRegistry, Registry, RegistryPolicy, SharedRegistry, Translator,
    };
    pub use crate::domain::{
        Builder, DomainError, Fields, Fragment, Name, Program, RegistryKey, Scaffold, Spec, Value,
    };
    pub use crate::error::{GirderError, GirderResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
