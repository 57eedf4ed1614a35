//! `girder config`: inspect configuration values.

use clap::ValueEnum;

use crate::{
    cli::{ConfigCommands, OnDuplicate},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "registry.lookup_timeout_ms" => Ok(config.registry.lookup_timeout_ms.to_string()),
        "registry.fail_fast" => Ok(config.registry.fail_fast.to_string()),
        "registry.on_duplicate" => Ok(value_name(OnDuplicate::from(config.registry.on_duplicate))),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(value_name(config.output.format)),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

/// The spelling clap and the config file accept for `value`.
fn value_name(value: impl ValueEnum) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_owned())
        .unwrap_or_default()
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use girder_core::application::DuplicatePolicy;

    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "registry.lookup_timeout_ms").unwrap(), "5000");
        assert_eq!(get_config_value(&cfg, "registry.fail_fast").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "output.format").unwrap(), "auto");
    }

    #[test]
    fn enum_values_use_config_spelling() {
        let mut cfg = AppConfig::default();
        cfg.registry.on_duplicate = DuplicatePolicy::KeepFirst;
        assert_eq!(
            get_config_value(&cfg, "registry.on_duplicate").unwrap(),
            "keep-first"
        );
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
