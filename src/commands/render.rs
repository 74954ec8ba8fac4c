//! Render command implementation.
//!
//! Loads a report history file, runs the dashboard pipeline and prints the
//! snapshot as a plain-text table, JSON or YAML.

use anyhow::{anyhow, Context};
use chrono::Local;
use hostmon_dashboard::{
    render, ClassifiedMetric, DashboardSnapshot, MemoryReportStore, ReportFixture,
    SchemaGeneration, Severity,
};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::cli::OutputFormat;
use crate::config::Config;

/// Reads a report history file. YAML by extension, JSON otherwise.
pub fn load_fixture(path: &Path) -> anyhow::Result<ReportFixture> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read reports file {}", path.display()))?;

    let fixture = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in reports file {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in reports file {}", path.display()))?,
    };
    Ok(fixture)
}

/// Opens the configured reports file as a store. Also returns the generation
/// recorded in the file, if any.
pub fn open_store(config: &Config) -> anyhow::Result<(MemoryReportStore, Option<SchemaGeneration>)> {
    let path = config
        .reports_file
        .as_deref()
        .ok_or_else(|| anyhow!("no reports file configured (use --reports or reports_file)"))?;

    let fixture = load_fixture(path)?;
    let generation = fixture.generation;
    let store = MemoryReportStore::from_fixture(fixture)
        .with_context(|| format!("failed to load reports from {}", path.display()))?;
    info!(
        "Loaded {} reports from {}",
        store.report_count(),
        path.display()
    );
    Ok((store, generation))
}

/// Renders the dashboard snapshot.
pub fn command_render(
    format: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let (store, fixture_generation) = open_store(config)?;
    let dashboard_config = config.dashboard_config(fixture_generation);
    let snapshot = render(&store, &dashboard_config)?;

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&snapshot)?,
        OutputFormat::Yaml => serde_yaml::to_string(&snapshot)?,
        OutputFormat::Text => format_text(&snapshot),
    };
    println!("{}", output.trim_end());
    Ok(())
}

/// Tier marker appended to a value: `*` warning, `!` critical.
fn marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Normal => "",
        Severity::Warning => "*",
        Severity::Critical => "!",
    }
}

fn metric(m: &ClassifiedMetric) -> String {
    format!("{:.2}{}", m.value, marker(m.severity))
}

/// Plain-text table of the snapshot.
pub fn format_text(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let generated = snapshot.generated_at.with_timezone(&Local);
    let with_kernel = snapshot.generation != SchemaGeneration::V1;
    let with_uptime = snapshot.generation == SchemaGeneration::V3;

    let _ = writeln!(
        out,
        "Host Mon: {}",
        generated.format("%A %b %d %H:%M:%S %Z")
    );
    let _ = writeln!(out);

    let mut header = format!("{:<20}", "HOST");
    if with_kernel {
        let _ = write!(header, " {:<18}", "KERNEL");
    }
    if with_uptime {
        let _ = write!(header, " {:<32} {:>12}", "RELEASE", "UPTIME");
    }
    let _ = write!(
        header,
        " {:>5} {:>14} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "CORES", "PHYSMEM(kB)", "LOAD1", "LOAD5", "LOAD15", "SWAP%", "DISK%"
    );
    let _ = writeln!(out, "{}", header);

    for row in &snapshot.rows {
        let r = &row.report;
        let mut line = format!("{:<20}", r.host);
        if with_kernel {
            let _ = write!(line, " {:<18}", r.kernel.as_deref().unwrap_or("-"));
        }
        if with_uptime {
            let _ = write!(
                line,
                " {:<32} {:>12}",
                r.release.as_deref().unwrap_or("-"),
                r.uptime.as_deref().unwrap_or("-")
            );
        }
        let _ = write!(
            line,
            " {:>5} {:>14} {:>8} {:>8} {:>8} {:>8} {:>8}",
            r.cores,
            r.physmem_kb,
            metric(&r.load1),
            metric(&r.load5),
            metric(&r.load15),
            metric(&r.swap_pct),
            r.disk_pct.as_ref().map_or_else(|| "-".to_string(), metric)
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} total hosts, {} total cores, {} kB total physical memory",
        snapshot.aggregate.total_hosts,
        snapshot.aggregate.total_cores,
        snapshot.aggregate.total_physmem_kb
    );
    let _ = writeln!(out, "(* warning, ! critical)");

    for skipped in &snapshot.skipped {
        let _ = writeln!(out, "skipped {}: {}", skipped.host, skipped.error);
    }
    if !snapshot.missing.is_empty() {
        let _ = writeln!(out, "no reports: {}", snapshot.missing.join(", "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostmon_dashboard::{DashboardConfig, ReportRow};
    use std::io::Write;
    use tempfile::Builder;

    fn snapshot(generation: SchemaGeneration, rows: Vec<ReportRow>) -> DashboardSnapshot {
        let mut store = MemoryReportStore::new();
        for row in rows {
            store.append(row).unwrap();
        }
        store.register_host("silent");
        let config = DashboardConfig {
            generation,
            report_missing_hosts: true,
            ..DashboardConfig::default()
        };
        render(&store, &config).unwrap()
    }

    #[test]
    fn test_format_text_v1() {
        let text = format_text(&snapshot(
            SchemaGeneration::V1,
            vec![
                ReportRow::new(["10", "alpha", "4", "8000", "5.0", "3.0", "1.0", "0", "12"]),
                ReportRow::new(["10", "beta", "4", "8000", "oops", "3.0", "1.0", "0", "12"]),
            ],
        ));

        assert!(text.contains("HOST"));
        assert!(!text.contains("KERNEL"));
        assert!(text.contains("5.00!"));
        assert!(text.contains("3.00*"));
        assert!(text.contains("12.00*"));
        assert!(text.contains("1 total hosts, 4 total cores, 8000 kB total physical memory"));
        assert!(text.contains("skipped beta"));
        assert!(text.contains("no reports: silent"));
    }

    #[test]
    fn test_format_text_without_disk_report() {
        let text = format_text(&snapshot(
            SchemaGeneration::V1,
            vec![ReportRow::new(["10", "alpha", "4", "8000", "1.0", "1.0", "1.0", "0", ""])],
        ));
        assert!(text.contains("alpha"));
        assert!(text.contains("1 total hosts, 4 total cores, 8000 kB total physical memory"));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn test_format_text_v3_columns() {
        let text = format_text(&snapshot(
            SchemaGeneration::V3,
            vec![ReportRow::new([
                "10", "alpha", "6.1.0", "Debian 12", "3576", "4", "8000", "0.1", "0.1", "0.1",
                "0", "/ 5",
            ])],
        ));
        assert!(text.contains("KERNEL"));
        assert!(text.contains("UPTIME"));
        assert!(text.contains("Debian 12"));
        assert!(text.contains("1:60:36"));
    }

    #[test]
    fn test_load_fixture_yaml() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "generation: 1\nhosts: [quiet]\nreports:\n  - [\"5\", busy, \"2\", \"2048\", \"3.0\", \"1.0\", \"1.0\", \"0\", \"5\"]"
        )
        .unwrap();

        let fixture = load_fixture(file.path()).unwrap();
        assert_eq!(fixture.generation, Some(SchemaGeneration::V1));
        assert_eq!(fixture.hosts, vec!["quiet".to_string()]);
        assert_eq!(fixture.reports.len(), 1);
    }

    #[test]
    fn test_load_fixture_errors_carry_path() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "{{not json").unwrap();
        let err = load_fixture(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid JSON"));

        let err = load_fixture(Path::new("/nonexistent/reports.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read reports file"));
    }

    #[test]
    fn test_open_store_requires_reports_file() {
        let config = Config::default();
        let err = open_store(&config).unwrap_err();
        assert!(err.to_string().contains("no reports file configured"));
    }
}
