//! Configuration management for hostmon-dashboard.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use hostmon_dashboard::{DashboardConfig, SchemaGeneration, ThresholdConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_GENERATION: SchemaGeneration = SchemaGeneration::V3;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Dashboard configuration as read from file and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema generation of report rows. Unset: taken from the reports file,
    /// falling back to generation 3.
    pub generation: Option<SchemaGeneration>,

    /// Report history file used by `render` and `check`
    #[serde(alias = "reports-file")]
    pub reports_file: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    // Rendering
    #[serde(alias = "uptime-carry")]
    pub uptime_carry: Option<bool>,
    #[serde(alias = "report-missing-hosts")]
    pub report_missing_hosts: Option<bool>,

    // Thresholds stay last so TOML output puts the table after plain values
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: None,
            reports_file: None,
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            uptime_carry: Some(false),
            report_missing_hosts: Some(false),
            thresholds: ThresholdConfig::default(),
        }
    }
}

impl Config {
    /// Builds the library configuration. `fixture_generation` is the generation
    /// recorded in the reports file, used when neither CLI nor config set one.
    pub fn dashboard_config(&self, fixture_generation: Option<SchemaGeneration>) -> DashboardConfig {
        DashboardConfig {
            generation: self
                .generation
                .or(fixture_generation)
                .unwrap_or(DEFAULT_GENERATION),
            thresholds: self.thresholds.clone(),
            uptime_carry: self.uptime_carry.unwrap_or(false),
            report_missing_hosts: self.report_missing_hosts.unwrap_or(false),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    cfg.thresholds.validate()?;

    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}', expected one of: {}",
                level,
                LOG_LEVELS.join(", ")
            )
            .into());
        }
    }

    if let Some(path) = cfg.reports_file.as_deref() {
        if !path.exists() {
            return Err(format!("Reports file not found: {}", path.display()).into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref().and_then(|p| p.to_str()))?
    };

    if let Some(generation) = args.generation {
        config.generation = Some(SchemaGeneration::try_from(generation)?);
    }

    if let Some(reports) = &args.reports {
        config.reports_file = Some(reports.clone());
    }

    if args.uptime_carry {
        config.uptime_carry = Some(true);
    }
    if args.report_missing_hosts {
        config.report_missing_hosts = Some(true);
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/hostmon/dashboard.yaml",
            "/etc/hostmon/dashboard.yml",
            "/etc/hostmon/dashboard.json",
            "./hostmon-dashboard.yaml",
            "./hostmon-dashboard.yml",
            "./hostmon-dashboard.json",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if path.to_string_lossy().is_empty() {
        return Ok(Config::default());
    }
    if !path.exists() {
        return Err(format!("Config file not found: {}", path.display()).into());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in the requested format
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}
