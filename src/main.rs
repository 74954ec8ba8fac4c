//! hostmon-dashboard - version 0.1.0
//!
//! Fleet health dashboard core with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing::{info, Level};

use cli::{Args, Commands, LogLevel, OutputFormat};
use commands::{command_check, command_config, command_generate_testdata, command_render};
use config::{resolve_config, show_config, validate_effective_config, Config, DEFAULT_LOG_LEVEL};

/// Maps a configured log level name onto the CLI enum.
fn parse_log_level(name: &str) -> Option<LogLevel> {
    match name.to_ascii_lowercase().as_str() {
        "off" => Some(LogLevel::Off),
        "error" => Some(LogLevel::Error),
        "warn" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}

/// Initializes tracing logging subsystem with configured log level.
/// CLI level wins over the config file.
fn setup_logging(config: &Config, args: &Args) {
    let level = args
        .log_level
        .clone()
        .or_else(|| config.log_level.as_deref().and_then(parse_log_level))
        .or_else(|| parse_log_level(DEFAULT_LOG_LEVEL))
        .unwrap_or(LogLevel::Warn);

    let max_level = match level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    // Logs go to stderr so rendered output on stdout stays machine-readable
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {:?}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = match resolve_config(&args) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
        };

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Config generation works without a valid config
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), format.clone(), *commented);
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config, &args);

    match &args.command {
        Some(Commands::Render { format }) => command_render(format.clone(), &config),
        None => command_render(OutputFormat::Text, &config),
        Some(Commands::Check) => command_check(&config),
        Some(Commands::GenerateTestdata {
            output,
            hosts,
            reports_per_host,
            silent_hosts,
        }) => command_generate_testdata(
            output.clone(),
            *hosts,
            *reports_per_host,
            *silent_hosts,
            &config,
        ),
        Some(Commands::Config { .. }) => unreachable!("Config handled above"),
    }
}
