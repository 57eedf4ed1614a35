//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the [`RegistryPolicy`]
//! derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. Environment variables: `GIRDER__REGISTRY__FAIL_FAST=true`
//! 3. Config file: `--config <FILE>`, else [`AppConfig::config_path`]
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use girder_core::application::{DEFAULT_LOOKUP_TIMEOUT, DuplicatePolicy, RegistryPolicy};

use crate::cli::global::OutputFormat;

const ENV_PREFIX: &str = "GIRDER";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// How references are looked up and duplicates handled.
    pub registry: RegistryConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub lookup_timeout_ms: u64,
    /// Overrides `lookup_timeout_ms` when set.
    pub fail_fast: bool,
    pub on_duplicate: DuplicatePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig {
                lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64,
                fail_fast: false,
                on_duplicate: DuplicatePolicy::Reject,
            },
            output: OutputConfig {
                no_color: false,
                format: OutputFormat::Auto,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the default location is read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => Self::file_source(path, true),
            None => Self::file_source(&Self::config_path(), false),
        };
        Self::load_from(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn file_source(
        path: &Path,
        required: bool,
    ) -> File<config::FileSourceFile, FileFormat> {
        debug!(path = %path.display(), required, "Reading configuration file");
        File::from(path).format(FileFormat::Toml).required(required)
    }

    fn load_from(
        file: File<config::FileSourceFile, FileFormat>,
        env: Environment,
    ) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let config: Self = Config::builder()
            .set_default("registry.lookup_timeout_ms", defaults.registry.lookup_timeout_ms)?
            .set_default("registry.fail_fast", defaults.registry.fail_fast)?
            .set_default("registry.on_duplicate", "reject")?
            .set_default("output.no_color", defaults.output.no_color)?
            .set_default("output.format", "auto")?
            .add_source(file)
            .add_source(env.prefix_separator("__").separator("__").try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.registry.lookup_timeout_ms == 0 {
            anyhow::bail!(
                "registry.lookup_timeout_ms must be positive; set registry.fail_fast to skip waiting"
            );
        }
        Ok(())
    }

    /// The registry policy these settings describe, before CLI flags.
    pub fn registry_policy(&self) -> RegistryPolicy {
        let policy = if self.registry.fail_fast {
            RegistryPolicy::fail_fast()
        } else {
            RegistryPolicy::blocking(Duration::from_millis(self.registry.lookup_timeout_ms))
        };
        policy.with_duplicates(self.registry.on_duplicate)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.girder.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "girder", "girder")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".girder.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An environment source that never reads the real process environment.
    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        std::io::Write::write_all(&mut file, contents.as_bytes()).unwrap();
        file
    }

    fn missing_file() -> File<config::FileSourceFile, FileFormat> {
        AppConfig::file_source(Path::new("/nonexistent/girder.toml"), false)
    }

    #[test]
    fn defaults_match_registry_policy_default() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.registry_policy(), RegistryPolicy::default());
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let cfg = AppConfig::load_from(missing_file(), env(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_toml(
            "[registry]\nfail_fast = true\non_duplicate = \"keep-first\"\n\n[output]\nformat = \"plain\"\n",
        );
        let cfg = AppConfig::load_from(AppConfig::file_source(file.path(), true), env(&[])).unwrap();

        assert!(cfg.registry.fail_fast);
        assert_eq!(cfg.output.format, OutputFormat::Plain);
        // Keys the file does not mention keep their defaults.
        assert_eq!(cfg.registry.lookup_timeout_ms, 5_000);
        assert_eq!(
            cfg.registry_policy(),
            RegistryPolicy::fail_fast().with_duplicates(DuplicatePolicy::KeepFirst)
        );
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_toml("[registry]\nlookup_timeout_ms = 100\n");
        let cfg = AppConfig::load_from(
            AppConfig::file_source(file.path(), true),
            env(&[("GIRDER__REGISTRY__LOOKUP_TIMEOUT_MS", "750")]),
        )
        .unwrap();
        assert_eq!(
            cfg.registry_policy().lookup_timeout,
            Some(Duration::from_millis(750))
        );
    }

    #[test]
    fn required_file_must_exist() {
        let file = AppConfig::file_source(Path::new("/nonexistent/girder.toml"), true);
        assert!(AppConfig::load_from(file, env(&[])).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = write_toml("[registry]\nlookup_timeout_ms = 0\n");
        let err = AppConfig::load_from(AppConfig::file_source(file.path(), true), env(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn unknown_duplicate_policy_is_rejected() {
        let file = write_toml("[registry]\non_duplicate = \"overwrite\"\n");
        assert!(
            AppConfig::load_from(AppConfig::file_source(file.path(), true), env(&[])).is_err()
        );
    }

    #[test]
    fn serialises_as_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[registry]"));
        assert!(text.contains("on_duplicate = \"reject\""));
        assert!(text.contains("format = \"auto\""));
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
