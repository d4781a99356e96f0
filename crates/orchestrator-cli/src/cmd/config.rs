use crate::output::{print_json, print_table};
use clap::Subcommand;
use orchestrator_core::config::WarnLevel;
use orchestrator_core::secrets::{Credentials, EnvSecrets};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration as YAML
    Show,

    /// Validate the config and report unset credentials
    Check,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(config_path: Option<&Path>, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config_path, json),
        ConfigSubcommand::Check => check(config_path, json),
    }
}

fn show(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    if json {
        print_json(&config)
    } else {
        print!("{}", config.to_yaml()?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn check(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let warnings = config.validate();
    let missing = Credentials::resolve(&EnvSecrets).missing();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
            "missing_credentials": missing,
        });
        print_json(&value)?;
    } else if warnings.is_empty() && missing.is_empty() {
        println!("Config is valid. All credentials set.");
    } else {
        let mut rows: Vec<Vec<String>> = warnings
            .iter()
            .map(|w| {
                let level = match w.level {
                    WarnLevel::Warning => "warning",
                    WarnLevel::Error => "error",
                };
                vec![level.to_string(), w.message.clone()]
            })
            .collect();
        rows.extend(
            missing
                .iter()
                .map(|name| vec!["warning".to_string(), format!("{name} is not set")]),
        );
        print_table(&["LEVEL", "MESSAGE"], rows);
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
