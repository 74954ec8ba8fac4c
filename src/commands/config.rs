//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("hostmon-dashboard.yaml"),
    };

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Host Mon Dashboard Configuration
# ================================
#
# Reports
# -------
# generation: null             # Row layout: 1, 2 or 3 (null = from reports file, else 3)
# reports_file: null           # Report history file (JSON/YAML)
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace
#
# Rendering
# ---------
# uptime_carry: false          # true = carry H:M:S, false = round each component
# report_missing_hosts: false  # List hosts without reports in the snapshot
#
# Thresholds
# ----------
# thresholds:
#   load_critical_ratio: 1.0   # Critical when load > cores * ratio
#   load_warning_ratio: 0.5    # Warning when load > cores * ratio
#   pct_critical: 66.0         # Critical when swap/disk % > value
#   pct_warning: 10.0          # Warning when swap/disk % > value
"#;

    format!("{comments}\n{yaml}")
}
