//! Implementation of the `girder translate` command.
//!
//! Looks up a built-in document, translates it against the default project
//! on a multi-threaded runtime, and prints the finished pipeline.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use girder_core::{
    application::{InMemoryRegistry, Registry, SharedRegistry, Translator},
    domain::RegistryKey,
};
use girder_pipeline::{Job, Pipeline, Project, builtin_documents};

use crate::{
    cli::TranslateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `girder translate` command.
#[instrument(skip_all, fields(document = %args.document))]
pub fn execute(args: TranslateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let document =
        builtin_documents::find(&args.document).ok_or_else(|| CliError::DocumentNotFound {
            name: args.document.clone(),
            available: builtin_documents::names(),
        })?;

    let policy = args.apply(config.registry_policy());
    debug!(?policy, "Registry policy resolved");

    let project = Project::default();
    let registry = Arc::new(InMemoryRegistry::new(policy));
    let shared: SharedRegistry = registry.clone();
    let translator = Translator::new(document.spec());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let pipeline = runtime.block_on(translator.translate_into(&project, &shared))?;

    info!(
        jobs = pipeline.jobs.len(),
        steps = pipeline.step_count(),
        "Document translated"
    );

    print_pipeline(&pipeline, &output)?;
    if args.show_registry {
        print_registry(&registry.keys(), &output)?;
    }

    output.success(&format!(
        "Translated '{}': {} jobs, {} steps",
        document.name,
        pipeline.jobs.len(),
        pipeline.step_count()
    ))?;

    Ok(())
}

fn print_pipeline(pipeline: &Pipeline, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Pipeline {}", pipeline.name))?;
    for job in &pipeline.jobs {
        for line in job_lines(job, output) {
            output.print(&line)?;
        }
    }
    Ok(())
}

fn job_lines(job: &Job, output: &OutputManager) -> Vec<String> {
    let mut lines = vec![format!(
        "  {} {}",
        job.name,
        output.detail(&format!("({}, {} min)", job.image, job.timeout_minutes))
    )];
    if !job.needs.is_empty() {
        lines.push(format!("    needs: {}", job.needs_names().join(", ")));
    }
    for (key, value) in &job.env {
        lines.push(format!("    env: {key}={value}"));
    }
    lines.extend(job.steps.iter().map(|step| format!("    - {step}")));
    lines
}

fn print_registry(keys: &[RegistryKey], output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Registry ({} entries)", keys.len()))?;
    for key in keys {
        output.print(&format!("  {key}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use girder_pipeline::Step;

    use super::*;
    use crate::cli::{GlobalArgs, OutputFormat};

    fn plain_output() -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config: None,
            output_format: OutputFormat::Plain,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn job(name: &str) -> Job {
        Job {
            name: name.into(),
            image: "rust:1".into(),
            steps: vec![Step::Checkout, Step::run("cargo test")],
            needs: Vec::new(),
            env: BTreeMap::new(),
            timeout_minutes: 60,
        }
    }

    #[test]
    fn job_lines_layout() {
        let mut package = job("package");
        package.needs.push(job("test"));
        package.env.insert("CARGO_TERM_COLOR".into(), "always".into());

        let lines = job_lines(&package, &plain_output());
        assert_eq!(
            lines,
            [
                "  package (rust:1, 60 min)",
                "    needs: test",
                "    env: CARGO_TERM_COLOR=always",
                "    - checkout",
                "    - run: cargo test",
            ]
        );
    }

    #[test]
    fn job_without_needs_has_no_needs_line() {
        let lines = job_lines(&job("lint"), &plain_output());
        assert!(lines.iter().all(|line| !line.contains("needs")));
    }
}
