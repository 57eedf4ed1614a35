//! Application services - resolution and translation.

pub mod resolver;
pub mod translator;

pub use translator::Translator;
