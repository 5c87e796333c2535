//! Config command - View and validate VerveGallery configuration
//!
//! Provides the `verve config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors
//! 3. Prints the configuration file path

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;
use vervegallery_core::config::{Config, ValidationError};

use crate::{
    output::{get_formatter, OutputFormat, OutputFormatter},
    GlobalOptions,
};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let fmt = get_formatter(opts);
        let path = opts.config_path.as_path();
        match self {
            ConfigCommand::Show => execute_show(path, &*fmt, opts.format),
            ConfigCommand::Validate => execute_validate(path, &*fmt, opts.format),
            ConfigCommand::Path => {
                if opts.format == OutputFormat::Json {
                    fmt.print_json(&serde_json::json!({
                        "config_path": path.display().to_string(),
                        "exists": path.exists(),
                    }));
                } else {
                    println!("{}", path.display());
                }
                Ok(())
            }
        }
    }
}

fn execute_show(path: &Path, fmt: &dyn OutputFormatter, format: OutputFormat) -> Result<()> {
    let config = Config::load_or_default(path);
    info!(config_path = %path.display(), "Showing configuration");

    if format == OutputFormat::Json {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        fmt.print_json(&json);
        return Ok(());
    }

    let source = if path.exists() { "" } else { ", defaults" };
    fmt.success(&format!("Configuration ({}{})", path.display(), source));
    fmt.info("");
    let yaml =
        serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
    for line in yaml.lines() {
        fmt.info(line);
    }
    Ok(())
}

/// Outcome of validating a configuration file
#[derive(Debug, PartialEq)]
enum Validation {
    Missing,
    Unparseable(String),
    Checked(Vec<ValidationError>),
}

fn validate_file(path: &Path) -> Validation {
    if !path.exists() {
        return Validation::Missing;
    }
    match Config::load(path) {
        Ok(config) => Validation::Checked(config.validate()),
        Err(e) => Validation::Unparseable(e.to_string()),
    }
}

fn execute_validate(path: &Path, fmt: &dyn OutputFormatter, format: OutputFormat) -> Result<()> {
    info!(config_path = %path.display(), "Validating configuration");
    let outcome = validate_file(path);

    if format == OutputFormat::Json {
        let (valid, errors): (bool, Vec<String>) = match &outcome {
            Validation::Missing => (
                false,
                vec!["Configuration file not found. Using defaults.".to_string()],
            ),
            Validation::Unparseable(e) => (false, vec![format!("Failed to parse configuration: {e}")]),
            Validation::Checked(errors) => {
                (errors.is_empty(), errors.iter().map(|e| e.to_string()).collect())
            }
        };
        fmt.print_json(&serde_json::json!({
            "valid": valid,
            "config_path": path.display().to_string(),
            "errors": errors,
        }));
        return Ok(());
    }

    match outcome {
        Validation::Missing => {
            fmt.info(&format!("Configuration file not found at {}", path.display()));
            fmt.info("Using default configuration. Set auth.client_id there to sign in.");
        }
        Validation::Unparseable(e) => {
            fmt.error(&format!("Failed to parse configuration: {}", e));
            fmt.info(&format!("File: {}", path.display()));
        }
        Validation::Checked(errors) if errors.is_empty() => {
            fmt.success("Configuration is valid");
            fmt.info(&format!("File: {}", path.display()));
        }
        Validation::Checked(errors) => {
            fmt.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            fmt.info(&format!("File: {}", path.display()));
            fmt.info("");
            for error in &errors {
                fmt.info(&format!("  {} - {}", error.field, error.message));
            }
        }
    }
    Ok(())
}
