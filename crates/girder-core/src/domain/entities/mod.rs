pub mod builder;
pub mod scaffold;
pub mod shell;
pub mod spec;

pub use builder::Builder;
pub use scaffold::{AnyValue, Scaffold, ScaffoldKind, Value};
pub use shell::{Assembler, Fields, Shell};
pub use spec::{Fragment, Program, Spec};
