//! CI pipeline vocabulary for Girder.
//!
//! A small domain built on `girder-core`: jobs that reference each other by
//! name, steps, toolchain matrices, and a handful of built-in documents.

pub mod builtin_documents;
pub mod model;
pub mod specs;

pub use builtin_documents::BuiltinDocument;
pub use model::{Job, Pipeline, Project, Step, Toolchain};
pub use specs::{JobBuilder, PipelineBuilder, job, job_fragment, pipeline, rust_defaults};
