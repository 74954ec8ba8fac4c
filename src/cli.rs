//! CLI arguments and subcommands for hostmon-dashboard.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output format for rendered snapshots
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "hostmon-dashboard",
    about = "Fleet health dashboard core for host monitor reports",
    long_about = "Fleet health dashboard core for host monitor reports.\n\n\
                  Selects the latest report of every monitored host, classifies load, swap \
                  and disk metrics into normal/warning/critical tiers and computes fleet-wide \
                  host, core and memory totals.",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (overrides log_level from the config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Schema generation of the report rows (1, 2 or 3)
    #[arg(short = 'g', long, global = true, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub generation: Option<u8>,

    /// Report history file (JSON/YAML)
    #[arg(short = 'r', long, global = true)]
    pub reports: Option<PathBuf>,

    /// Render uptime with carrying H:M:S instead of per-component rounding
    #[arg(long, global = true)]
    pub uptime_carry: bool,

    /// List hosts without reports in the snapshot
    #[arg(long, global = true)]
    pub report_missing_hosts: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the dashboard snapshot from a report history file
    Render {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate configuration and the report history file
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Generate a synthetic report history file
    GenerateTestdata {
        /// Output file path
        #[arg(short = 'o', long, default_value = "reports.json")]
        output: PathBuf,

        /// Number of reporting hosts
        #[arg(long, default_value_t = 12)]
        hosts: usize,

        /// Reports per reporting host
        #[arg(long, default_value_t = 5)]
        reports_per_host: usize,

        /// Registered hosts that never reported
        #[arg(long, default_value_t = 2)]
        silent_hosts: usize,
    },
}
