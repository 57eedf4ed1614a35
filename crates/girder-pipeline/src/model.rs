//! Resolved pipeline values.
//!
//! These are what a translation produces. They are plain data: every
//! reference has already been replaced by the job it named.

use std::collections::BTreeMap;
use std::fmt;

/// A finished pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub name: String,
    pub jobs: Vec<Job>,
}

impl Pipeline {
    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name == name)
    }

    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(|job| job.name.as_str()).collect()
    }

    /// Total number of steps across all jobs.
    pub fn step_count(&self) -> usize {
        self.jobs.iter().map(|job| job.steps.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub image: String,
    pub steps: Vec<Step>,
    /// Jobs this one waits for, resolved from their names.
    pub needs: Vec<Job>,
    pub env: BTreeMap<String, String>,
    pub timeout_minutes: u32,
}

impl Job {
    pub fn needs_names(&self) -> Vec<&str> {
        self.needs.iter().map(|job| job.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Checkout,
    Run { command: String },
    Cache { key: String, paths: Vec<String> },
}

impl Step {
    pub fn run(command: impl Into<String>) -> Self {
        Self::Run {
            command: command.into(),
        }
    }

    pub fn cache<I, S>(key: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Cache {
            key: key.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkout => f.write_str("checkout"),
            Self::Run { command } => write!(f, "run: {command}"),
            Self::Cache { key, paths } => write!(f, "cache {key}: {}", paths.join(", ")),
        }
    }
}

// ── Contexts ─────────────────────────────────────────────────────────────────

/// One entry of a toolchain matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub channel: String,
    pub target: Option<String>,
}

impl Toolchain {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Suffix used in job names, e.g. `stable` or `nightly-wasm32-unknown-unknown`.
    pub fn slug(&self) -> String {
        match &self.target {
            Some(target) => format!("{}-{}", self.channel, target),
            None => self.channel.clone(),
        }
    }
}

/// The context documents are translated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub toolchains: Vec<Toolchain>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            toolchains: Vec::new(),
        }
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchains.push(toolchain);
        self
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("girder")
            .with_toolchain(Toolchain::new("stable"))
            .with_toolchain(Toolchain::new("beta"))
            .with_toolchain(Toolchain::new("nightly").with_target("wasm32-unknown-unknown"))
    }
}
