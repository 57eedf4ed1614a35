//! Documents that ship with Girder.
//!
//! Each document is a `Spec<Project, Pipeline>`; the CLI translates them
//! against [`Project::default`].
//!
//! | Document   | Shows                                                      |
//! |------------|------------------------------------------------------------|
//! | `rust-ci`  | a toolchain matrix via `jobs_for_each`, a shared fragment  |
//! | `release`  | jobs that need jobs defined after them                     |
//! | `broken`   | a job without an image                                     |
//! | `dangling` | a job that needs a job nobody defines                      |

use tracing::debug;

use girder_core::domain::Spec;

use crate::{
    model::{Pipeline, Project, Toolchain},
    specs::{JobBuilder, PipelineBuilder, job, pipeline, rust_defaults},
};

#[derive(Debug, Clone, Copy)]
pub struct BuiltinDocument {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Spec<Project, Pipeline>,
}

impl BuiltinDocument {
    pub fn spec(&self) -> Spec<Project, Pipeline> {
        (self.build)()
    }
}

static DOCUMENTS: [BuiltinDocument; 4] = [
    BuiltinDocument {
        name: "rust-ci",
        description: "Lint, a test job per toolchain, then package",
        build: rust_ci,
    },
    BuiltinDocument {
        name: "release",
        description: "Publish after verify and build, declared in reverse order",
        build: release,
    },
    BuiltinDocument {
        name: "broken",
        description: "A docs job that never sets its image",
        build: broken,
    },
    BuiltinDocument {
        name: "dangling",
        description: "A deploy job that needs an undefined staging job",
        build: dangling,
    },
];

pub fn all() -> &'static [BuiltinDocument] {
    &DOCUMENTS
}

pub fn find(name: &str) -> Option<&'static BuiltinDocument> {
    let found = DOCUMENTS.iter().find(|doc| doc.name == name);
    debug!(name, found = found.is_some(), "looking up built-in document");
    found
}

pub fn names() -> Vec<&'static str> {
    DOCUMENTS.iter().map(|doc| doc.name).collect()
}

// ── Documents ────────────────────────────────────────────────────────────────

fn rust_ci() -> Spec<Project, Pipeline> {
    let lint = job("lint", |j: &mut JobBuilder<'_, '_, Project>| {
        j.include(&rust_defaults())
            .run("cargo fmt --all -- --check")
            .run("cargo clippy --all-targets -- -D warnings");
    });

    let test = job("test", |j: &mut JobBuilder<'_, '_, Toolchain>| {
        let toolchain = j.context().clone();
        j.name(format!("test-{}", toolchain.slug()))
            .include(&rust_defaults())
            .image(format!("rust:{}", toolchain.channel))
            .needs("lint");
        match &toolchain.target {
            Some(target) => {
                j.run(format!("rustup target add {target}"))
                    .run(format!("cargo build --target {target}"));
            }
            None => {
                j.run("cargo test --all");
            }
        }
    });

    let package = job("package", |j: &mut JobBuilder<'_, '_, Project>| {
        let project = j.context().clone();
        j.include(&rust_defaults())
            .env("CARGO_TERM_COLOR", "always")
            .run(format!("cargo package -p {}", project.name))
            .timeout_minutes(30);
        for toolchain in &project.toolchains {
            j.needs(format!("test-{}", toolchain.slug()));
        }
    });

    pipeline("rust-ci", move |p: &mut PipelineBuilder<'_, '_, Project>| {
        let toolchains = p.context().toolchains.clone();
        p.job(&lint).jobs_for_each(&toolchains, &test).job(&package);
    })
}

fn release() -> Spec<Project, Pipeline> {
    let publish = job("publish", |j: &mut JobBuilder<'_, '_, Project>| {
        let name = j.context().name.clone();
        j.include(&rust_defaults())
            .needs("verify")
            .needs("build")
            .env("CARGO_REGISTRY_TOKEN", "${{ secrets.CARGO_REGISTRY_TOKEN }}")
            .run(format!("cargo publish -p {name}"));
    });

    let verify = job("verify", |j: &mut JobBuilder<'_, '_, Project>| {
        j.include(&rust_defaults())
            .needs("build")
            .run("cargo test --release");
    });

    let build = job("build", |j: &mut JobBuilder<'_, '_, Project>| {
        j.include(&rust_defaults())
            .run("cargo build --release")
            .timeout_minutes(45);
    });

    pipeline("release", move |p: &mut PipelineBuilder<'_, '_, Project>| {
        p.job(&publish).job(&verify).job(&build);
    })
}

fn broken() -> Spec<Project, Pipeline> {
    let docs = job("docs", |j: &mut JobBuilder<'_, '_, Project>| {
        j.checkout().run("cargo doc --no-deps");
    });

    pipeline("broken", move |p: &mut PipelineBuilder<'_, '_, Project>| {
        p.job(&docs);
    })
}

fn dangling() -> Spec<Project, Pipeline> {
    let deploy = job("deploy", |j: &mut JobBuilder<'_, '_, Project>| {
        j.include(&rust_defaults())
            .needs("staging")
            .run("./deploy.sh");
    });

    pipeline("dangling", move |p: &mut PipelineBuilder<'_, '_, Project>| {
        p.job(&deploy);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names = names();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find("release").map(|doc| doc.name), Some("release"));
        assert!(find("nope").is_none());
    }
}
