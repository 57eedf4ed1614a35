//! Pipeline specs and their typed builders.
//!
//! `JobBuilder` and `PipelineBuilder` are thin wrappers that give the field
//! names of [`Job`] and [`Pipeline`] a typed surface; everything they do is a
//! single call on the underlying [`Builder`].

use std::borrow::Borrow;
use std::collections::BTreeMap;

use girder_core::domain::{Builder, DomainError, Fields, Fragment, Name, Program, Spec};

use crate::model::{Job, Pipeline, Step};

pub const JOB: &str = "Job";
pub const PIPELINE: &str = "Pipeline";

/// Applied when a job does not set `timeout_minutes`.
pub const DEFAULT_TIMEOUT_MINUTES: u32 = 60;

pub const DEFAULT_IMAGE: &str = "rust:1";

// ── Job ──────────────────────────────────────────────────────────────────────

/// Spec for a job named `name`. Jobs register under their name, so other
/// jobs can `needs` them from anywhere in the document.
pub fn job<C, F>(name: impl Into<String>, program: F) -> Spec<C, Job>
where
    C: 'static,
    F: Fn(&mut JobBuilder<'_, '_, C>) + Send + Sync + 'static,
{
    let name = name.into();
    Spec::new(
        JOB,
        move |b: &mut Builder<'_, C>| {
            let mut job = JobBuilder::new(b);
            job.name(name.clone());
            program(&mut job);
        },
        assemble_job,
    )
    .require(&["name", "image"])
}

/// A reusable piece of job configuration, applied with [`JobBuilder::include`].
pub fn job_fragment<C, F>(program: F) -> Fragment<C>
where
    C: 'static,
    F: Fn(&mut JobBuilder<'_, '_, C>) + Send + Sync + 'static,
{
    Fragment::new(move |b: &mut Builder<'_, C>| program(&mut JobBuilder::new(b)))
}

/// Image, checkout and a cargo cache.
pub fn rust_defaults<C: 'static>() -> Fragment<C> {
    job_fragment(|j| {
        j.image(DEFAULT_IMAGE)
            .checkout()
            .cache("cargo", ["~/.cargo/registry", "target"]);
    })
}

fn assemble_job(fields: &Fields) -> Result<Job, DomainError> {
    let timeout_minutes = fields.value_or("timeout_minutes", DEFAULT_TIMEOUT_MINUTES)?;
    if timeout_minutes == 0 {
        return Err(DomainError::assembly(JOB, "timeout_minutes must be positive"));
    }

    Ok(Job {
        name: fields.required("name")?,
        image: fields.required("image")?,
        steps: fields.list("steps")?,
        needs: fields.list("needs")?,
        env: fields
            .list::<(String, String)>("env")?
            .into_iter()
            .collect::<BTreeMap<_, _>>(),
        timeout_minutes,
    })
}

pub struct JobBuilder<'b, 'c, C> {
    inner: &'b mut Builder<'c, C>,
}

impl<'b, 'c, C> JobBuilder<'b, 'c, C> {
    pub fn new(inner: &'b mut Builder<'c, C>) -> Self {
        Self { inner }
    }

    pub fn context(&self) -> &'c C {
        self.inner.context()
    }

    /// Rename the job; the registered name follows.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.inner.set("name", name.clone()).register_as(name);
        self
    }

    pub fn image(&mut self, image: impl Into<String>) -> &mut Self {
        self.inner.set("image", image.into());
        self
    }

    pub fn step(&mut self, step: Step) -> &mut Self {
        self.inner.push("steps", step);
        self
    }

    pub fn checkout(&mut self) -> &mut Self {
        self.step(Step::Checkout)
    }

    pub fn run(&mut self, command: impl Into<String>) -> &mut Self {
        self.step(Step::run(command))
    }

    pub fn cache<I, S>(&mut self, key: impl Into<String>, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Step::cache(key, paths))
    }

    /// Wait for the job registered as `job`, wherever it is defined.
    pub fn needs(&mut self, job: impl Into<Name>) -> &mut Self {
        self.inner.push_ref::<Job>("needs", job);
        self
    }

    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.push("env", (key.into(), value.into()));
        self
    }

    pub fn timeout_minutes(&mut self, minutes: u32) -> &mut Self {
        self.inner.set("timeout_minutes", minutes);
        self
    }

    pub fn include<P>(&mut self, program: &P) -> &mut Self
    where
        P: Program<C> + ?Sized,
    {
        self.inner.include(program);
        self
    }

    /// The untyped builder, for fields this wrapper does not cover.
    pub fn builder(&mut self) -> &mut Builder<'c, C> {
        &mut *self.inner
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

pub fn pipeline<C, F>(name: impl Into<String>, program: F) -> Spec<C, Pipeline>
where
    C: 'static,
    F: Fn(&mut PipelineBuilder<'_, '_, C>) + Send + Sync + 'static,
{
    let name = name.into();
    Spec::new(
        PIPELINE,
        move |b: &mut Builder<'_, C>| {
            let mut pipeline = PipelineBuilder::new(b);
            pipeline.name(name.clone());
            program(&mut pipeline);
        },
        assemble_pipeline,
    )
    .require(&["name"])
}

fn assemble_pipeline(fields: &Fields) -> Result<Pipeline, DomainError> {
    let jobs: Vec<Job> = fields.list("jobs")?;
    if jobs.is_empty() {
        return Err(DomainError::assembly(PIPELINE, "a pipeline needs at least one job"));
    }
    Ok(Pipeline {
        name: fields.required("name")?,
        jobs,
    })
}

pub struct PipelineBuilder<'b, 'c, C> {
    inner: &'b mut Builder<'c, C>,
}

impl<'b, 'c, C: 'static> PipelineBuilder<'b, 'c, C> {
    pub fn new(inner: &'b mut Builder<'c, C>) -> Self {
        Self { inner }
    }

    pub fn context(&self) -> &'c C {
        self.inner.context()
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.inner.set("name", name.into());
        self
    }

    /// Add a job built against this pipeline's context.
    pub fn job(&mut self, spec: &Spec<C, Job>) -> &mut Self {
        self.inner.push_spec("jobs", spec);
        self
    }

    /// Add a job defined elsewhere (another translation sharing the
    /// registry, for instance) by its name.
    pub fn reuse(&mut self, job: impl Into<Name>) -> &mut Self {
        self.inner.push_ref::<Job>("jobs", job);
        self
    }

    /// One job per context, in iteration order.
    pub fn jobs_for_each<C2, I>(&mut self, contexts: I, spec: &Spec<C2, Job>) -> &mut Self
    where
        C2: 'static,
        I: IntoIterator,
        I::Item: Borrow<C2>,
    {
        let spec = spec.clone();
        let add_job = Fragment::new(move |b: &mut Builder<'_, C2>| {
            b.push_spec("jobs", &spec);
        });
        self.inner.include_for_each(contexts, &add_job);
        self
    }

    pub fn include<P>(&mut self, program: &P) -> &mut Self
    where
        P: Program<C> + ?Sized,
    {
        self.inner.include(program);
        self
    }

    pub fn builder(&mut self) -> &mut Builder<'c, C> {
        &mut *self.inner
    }
}
