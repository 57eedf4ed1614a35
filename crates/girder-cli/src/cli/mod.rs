//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use girder_core::application::{DuplicatePolicy, RegistryPolicy};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "girder",
    bin_name = "girder",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Resolve declarative pipeline documents",
    long_about = "Girder translates declarative documents into finished pipelines. \
                  Jobs may need jobs defined anywhere else in the document; \
                  references are resolved concurrently through a registry.",
    after_help = "EXAMPLES:\n\
        \x20 girder list\n\
        \x20 girder translate rust-ci\n\
        \x20 girder translate release --show-registry\n\
        \x20 girder translate dangling --fail-fast\n\
        \x20 girder completions bash > /usr/share/bash-completion/completions/girder",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Translate a built-in document and print the resulting pipeline.
    #[command(
        visible_alias = "t",
        about = "Translate a document",
        after_help = "EXAMPLES:\n\
            \x20 girder translate rust-ci\n\
            \x20 girder translate release --on-duplicate keep-first\n\
            \x20 girder translate dangling --lookup-timeout-ms 200"
    )]
    Translate(TranslateArgs),

    /// List built-in documents.
    #[command(
        visible_alias = "ls",
        about = "List built-in documents",
        after_help = "EXAMPLES:\n\
            \x20 girder list\n\
            \x20 girder list --format csv"
    )]
    List(ListArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 girder init\n\
            \x20 girder init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 girder completions bash > ~/.local/share/bash-completion/completions/girder\n\
            \x20 girder completions zsh  > ~/.zfunc/_girder\n\
            \x20 girder completions fish > ~/.config/fish/completions/girder.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Girder configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 girder config get registry.lookup_timeout_ms\n\
            \x20 girder config list\n\
            \x20 girder config path"
    )]
    Config(ConfigCommands),
}

// ── translate ─────────────────────────────────────────────────────────────────

/// Arguments for `girder translate`.
#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// Name of a built-in document (see `girder list`).
    #[arg(value_name = "DOCUMENT", help = "Document to translate")]
    pub document: String,

    /// Fail a reference lookup immediately instead of waiting for it.
    #[arg(
        long = "fail-fast",
        conflicts_with = "lookup_timeout_ms",
        help = "Fail unresolved references immediately"
    )]
    pub fail_fast: bool,

    /// How long a reference lookup waits for its target to be registered.
    #[arg(
        long = "lookup-timeout-ms",
        value_name = "MS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Reference lookup timeout in milliseconds"
    )]
    pub lookup_timeout_ms: Option<u64>,

    /// What happens when two entities register under the same name.
    #[arg(
        long = "on-duplicate",
        value_enum,
        value_name = "POLICY",
        help = "Duplicate registration policy"
    )]
    pub on_duplicate: Option<OnDuplicate>,

    /// Print every registered key after a successful translation.
    #[arg(long = "show-registry", help = "Print the registry contents")]
    pub show_registry: bool,
}

impl TranslateArgs {
    /// Overlay the flags that were given on a policy loaded from config.
    pub fn apply(&self, mut policy: RegistryPolicy) -> RegistryPolicy {
        if self.fail_fast {
            policy.lookup_timeout = None;
        }
        if let Some(ms) = self.lookup_timeout_ms {
            policy.lookup_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(on_duplicate) = self.on_duplicate {
            policy.on_duplicate = on_duplicate.into();
        }
        policy
    }
}

/// CLI spelling of [`DuplicatePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnDuplicate {
    /// Fail the translation.
    Reject,
    /// Keep the first registration.
    KeepFirst,
}

impl From<OnDuplicate> for DuplicatePolicy {
    fn from(value: OnDuplicate) -> Self {
        match value {
            OnDuplicate::Reject => Self::Reject,
            OnDuplicate::KeepFirst => Self::KeepFirst,
        }
    }
}

impl From<DuplicatePolicy> for OnDuplicate {
    fn from(value: DuplicatePolicy) -> Self {
        match value {
            DuplicatePolicy::Reject => Self::Reject,
            DuplicatePolicy::KeepFirst => Self::KeepFirst,
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `girder list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Name and description, aligned.
    Table,
    /// One name per line.
    List,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `girder init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `girder completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `girder config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `registry.fail_fast`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    fn translate_args(args: &[&str]) -> TranslateArgs {
        let argv = ["girder", "translate"].iter().chain(args).copied();
        match Cli::parse_from(argv).command {
            Commands::Translate(args) => args,
            other => panic!("expected Translate, got {other:?}"),
        }
    }

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_translate_command() {
        let args = translate_args(&["rust-ci", "--show-registry"]);
        assert_eq!(args.document, "rust-ci");
        assert!(args.show_registry);
        assert!(!args.fail_fast);
    }

    #[test]
    fn on_duplicate_is_kebab_case() {
        let args = translate_args(&["release", "--on-duplicate", "keep-first"]);
        assert_eq!(args.on_duplicate, Some(OnDuplicate::KeepFirst));
    }

    #[test]
    fn fail_fast_and_timeout_conflict() {
        let result = Cli::try_parse_from([
            "girder",
            "translate",
            "rust-ci",
            "--fail-fast",
            "--lookup-timeout-ms",
            "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result =
            Cli::try_parse_from(["girder", "translate", "x", "--lookup-timeout-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_policy() {
        let base = RegistryPolicy::default();

        let policy = translate_args(&["x", "--fail-fast"]).apply(base);
        assert_eq!(policy.lookup_timeout, None);
        assert_eq!(policy.on_duplicate, DuplicatePolicy::Reject);

        let policy = translate_args(&["x", "--lookup-timeout-ms", "250", "--on-duplicate", "keep-first"])
            .apply(RegistryPolicy::fail_fast());
        assert_eq!(policy.lookup_timeout, Some(Duration::from_millis(250)));
        assert_eq!(policy.on_duplicate, DuplicatePolicy::KeepFirst);
    }

    #[test]
    fn no_flags_keep_policy() {
        let base = RegistryPolicy::fail_fast().with_duplicates(DuplicatePolicy::KeepFirst);
        assert_eq!(translate_args(&["x"]).apply(base), base);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["girder", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
