//! Core domain layer for Girder.
//!
//! Pure data and accumulation: value objects, the scaffold tree and the
//! builder that produces it.
//!
//! ## Boundaries
//!
//! - **No I/O**: nothing here touches the filesystem or the network
//! - **No scheduling**: the resolution algorithm (tasks, joins, the
//!   registry) lives in the application layer
//! - **Infallible accumulation**: builders never fail; everything is
//!   checked when a shell is resolved

pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    AnyValue, Assembler, Builder, Fields, Fragment, Program, Scaffold, ScaffoldKind, Shell, Spec,
    Value,
};
pub use error::{DomainError, ErrorCategory};
pub use validation::ShellValidator;
pub use value_objects::{Name, RegistryKey, TypeTag};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Job {
        name: String,
        steps: Vec<String>,
    }

    fn job_spec() -> Spec<String, Job> {
        Spec::new(
            "Job",
            |b: &mut Builder<'_, String>| {
                let name = b.context().clone();
                b.set("name", name.clone()).register_as(name);
                b.push("steps", "checkout".to_string());
            },
            |f| {
                Ok(Job {
                    name: f.required("name")?,
                    steps: f.list("steps")?,
                })
            },
        )
        .require(&["name"])
    }

    fn seal<C>(builder: Builder<'_, C>) -> Shell<()> {
        let assemble: Assembler<()> = Arc::new(|_: &Fields| Ok::<(), DomainError>(()));
        builder.into_shell("Job", Arc::from(Vec::<&'static str>::new()), assemble)
    }

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn type_tag_equality_ignores_name() {
        assert_eq!(TypeTag::of::<Job>(), TypeTag::of::<Job>());
        assert_ne!(TypeTag::of::<Job>(), TypeTag::of::<String>());
        assert_eq!(TypeTag::of::<Job>().name(), "Job");
    }

    #[test]
    fn type_tag_keeps_generic_arguments() {
        assert!(TypeTag::of::<Vec<Job>>().name().starts_with("Vec<"));
    }

    #[test]
    fn registry_key_display() {
        let key = RegistryKey::of::<Job>("build");
        assert_eq!(key.to_string(), "Job:build");
        assert_eq!(
            key.unresolved().to_string(),
            "No Job named 'build' was registered"
        );
    }

    #[test]
    fn blank_name_is_invalid() {
        assert!(Name::from("  ").validate().is_err());
        assert!(Name::from("build").validate().is_ok());
    }

    // ========================================================================
    // Builder Tests
    // ========================================================================

    #[test]
    fn set_is_last_write_wins() {
        let ctx = ();
        let mut b = Builder::new(&ctx);
        b.set("image", "a".to_string()).set("image", "b".to_string());
        let shell = seal(b);
        assert_eq!(shell.field_len("image"), Some(1));
    }

    #[test]
    fn push_concatenates_and_promotes_scalar() {
        let ctx = ();
        let mut b = Builder::new(&ctx);
        b.set("steps", 1u8).push("steps", 2u8).extend("steps", [3u8, 4u8]);
        let shell = seal(b);
        assert_eq!(shell.field_len("steps"), Some(4));
    }

    #[test]
    fn include_for_each_repeats_per_context() {
        let contexts = ["x".to_string(), "y".to_string(), "z".to_string()];
        let per_context = Fragment::new(|b: &mut Builder<'_, String>| {
            let entry = b.context().clone();
            b.push("steps", entry);
            b.push("steps", "again".to_string());
        });
        let ctx = ();
        let mut b = Builder::new(&ctx);
        b.include_for_each(&contexts, &per_context);
        let shell = seal(b);
        assert_eq!(shell.field_len("steps"), Some(6));
    }

    #[test]
    fn fork_starts_empty() {
        let ctx = ();
        let mut b = Builder::new(&ctx);
        b.set("image", "rust".to_string());
        let other = 7u32;
        let fork = b.fork(&other);
        assert_eq!(*fork.context(), 7);
        let shell = seal(fork);
        assert!(!shell.has_field("image"));
    }

    #[test]
    fn merge_takes_name_from_other() {
        let ctx = ();
        let mut b = Builder::new(&ctx);
        b.register_as("first");
        let mut other = b.fork(&ctx);
        other.register_as("second");
        b.merge(other);
        let shell = seal(b);
        assert_eq!(shell.registered_name(), Some(&Name::from("second")));
    }

    // ========================================================================
    // Spec Tests
    // ========================================================================

    #[test]
    fn connect_is_independent_per_context() {
        let spec = job_spec();
        let build = spec.connect(&"build".to_string());
        let test = spec.connect(&"test".to_string());
        assert_eq!(build.registered_name(), Some(&Name::from("build")));
        assert_eq!(test.registered_name(), Some(&Name::from("test")));
        assert_eq!(build.field_len("steps"), Some(1));
        assert_eq!(test.field_len("steps"), Some(1));
    }

    #[test]
    fn growing_one_connection_leaves_the_other_alone() {
        let spec = job_spec();
        let extra = Fragment::new(|b: &mut Builder<'_, String>| {
            b.push("steps", "deploy".to_string());
            b.set("image", "rust:1".to_string());
        });
        let (build, test) = ("build".to_string(), "test".to_string());

        let mut grown = Builder::new(&build);
        grown.include(&spec);
        let mut plain = Builder::new(&test);
        plain.include(&spec);

        grown.push("steps", "lint".to_string()).include(&extra);
        let (grown, plain) = (seal(grown), seal(plain));

        assert_eq!(grown.field_len("steps"), Some(3));
        assert!(grown.has_field("image"));
        assert_eq!(plain.field_len("steps"), Some(1));
        assert!(!plain.has_field("image"));
        assert_eq!(plain.registered_name(), Some(&Name::from("test")));

        // A connection made afterwards still starts from the spec alone.
        let fresh = spec.connect(&"fresh".to_string());
        assert_eq!(fresh.field_len("steps"), Some(1));
        assert!(!fresh.has_field("image"));
    }

    #[test]
    fn validator_reports_missing_required_field() {
        let spec: Spec<(), Job> = Spec::new("Job", |_| {}, |_| Err(DomainError::assembly("Job", "unreachable")))
            .require(&["image"]);
        let shell = spec.connect(&());
        let err = ShellValidator::validate_shell(&shell).unwrap_err();
        assert_eq!(err.to_string(), "Job is missing the image property");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn validator_rejects_blank_registered_name() {
        let spec: Spec<(), Job> = Spec::new(
            "Job",
            |b| {
                b.register_as("");
            },
            |_| Err(DomainError::assembly("Job", "unreachable")),
        );
        let shell = spec.connect(&());
        assert!(matches!(
            ShellValidator::validate_shell(&shell),
            Err(DomainError::InvalidName { .. })
        ));
    }
}
