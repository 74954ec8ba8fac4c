//! Generate testdata command implementation.
//!
//! Generates synthetic report history files for testing.

use chrono::Utc;
use hostmon_dashboard::{ReportFixture, ReportRow, SchemaGeneration};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;

// Constants for test data generation ranges
const CORE_CHOICES: [u32; 6] = [2, 4, 8, 16, 32, 64];
const KB_PER_CORE: u64 = 4 * 1024 * 1024; // 4 GB per core
const REPORT_INTERVAL_SECS: i64 = 300; // agents report every 5 minutes
const MAX_UPTIME_SECS: f64 = 90.0 * 24.0 * 3600.0; // 90 days
const MOUNTS: [&str; 4] = ["/", "/home", "/var", "/tmp"];
const KERNELS: [&str; 3] = ["5.15.0-91-generic", "6.1.0-13-amd64", "4.18.0-513.el8.x86_64"];
const RELEASES: [&str; 3] = [
    "Ubuntu 22.04.3 LTS",
    "Debian GNU/Linux 12 (bookworm)",
    "Rocky Linux release 8.9 (Green Obsidian)",
];

/// Generates a synthetic report history.
pub fn generate_fixture(
    generation: SchemaGeneration,
    hosts: usize,
    reports_per_host: usize,
    silent_hosts: usize,
) -> ReportFixture {
    let mut rng = rand::thread_rng();
    let now = Utc::now().timestamp();
    let mut reports = Vec::with_capacity(hosts * reports_per_host);

    for idx in 1..=hosts {
        let host = format!("node{:02}", idx);
        let cores = *CORE_CHOICES.choose(&mut rng).unwrap_or(&4);
        let physmem_kb = u64::from(cores) * KB_PER_CORE - rng.gen_range(0..65_536u64);
        let kernel = KERNELS.choose(&mut rng).copied().unwrap_or("unknown");
        let release = RELEASES.choose(&mut rng).copied().unwrap_or("unknown");
        let boot_uptime = rng.gen_range(0.0..MAX_UPTIME_SECS);

        for n in 0..reports_per_host {
            // Oldest report first, newest one at `now`
            let age = (reports_per_host - 1 - n) as i64 * REPORT_INTERVAL_SECS;
            let timestamp = now - age;
            let uptime = boot_uptime - age as f64;

            // Mostly idle hosts with the occasional busy one
            let load_ceiling = f64::from(cores) * if rng.gen_bool(0.2) { 1.4 } else { 0.6 };
            let load1: f64 = rng.gen_range(0.0..load_ceiling);
            let load5 = (load1 * rng.gen_range(0.7_f64..1.1)).max(0.0);
            let load15 = (load5 * rng.gen_range(0.7_f64..1.1)).max(0.0);
            let swap_pct: f64 = if rng.gen_bool(0.7) {
                rng.gen_range(0.0..10.0)
            } else {
                rng.gen_range(10.0..100.0)
            };

            // Now and then df fails and the agent sends an empty disk report
            let disk = if rng.gen_bool(0.05) {
                String::new()
            } else {
                MOUNTS[..rng.gen_range(1..=MOUNTS.len())]
                    .iter()
                    .map(|mount| format!("{} {}", mount, rng.gen_range(1..100)))
                    .collect::<Vec<_>>()
                    .join(" ")
            };

            let mut cells = vec![timestamp.to_string(), host.clone()];
            match generation {
                SchemaGeneration::V1 => {}
                SchemaGeneration::V2 => cells.push(kernel.to_string()),
                SchemaGeneration::V3 => {
                    cells.push(kernel.to_string());
                    cells.push(release.to_string());
                    if uptime > 0.0 {
                        cells.push(format!("{:.2}", uptime));
                    } else {
                        cells.push("unknown".to_string());
                    }
                }
            }
            cells.extend([
                cores.to_string(),
                physmem_kb.to_string(),
                format!("{:.6}", load1),
                format!("{:.6}", load5),
                format!("{:.6}", load15),
                format!("{:.6}", swap_pct),
                disk,
            ]);
            reports.push(ReportRow { cells });
        }
        debug!("Generated {} reports for {}", reports_per_host, host);
    }

    let silent = (1..=silent_hosts).map(|idx| format!("idle{:02}", idx));

    ReportFixture {
        generation: Some(generation),
        hosts: silent.collect(),
        reports,
    }
}

/// Writes the fixture as YAML or JSON depending on the output extension.
fn write_fixture(output: &Path, fixture: &ReportFixture) -> Result<(), Box<dyn std::error::Error>> {
    let content = match output.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::to_string(fixture)?,
        _ => serde_json::to_string_pretty(fixture)?,
    };
    fs::write(output, content)?;
    Ok(())
}

/// Generates a synthetic report history file.
pub fn command_generate_testdata(
    output: PathBuf,
    hosts: usize,
    reports_per_host: usize,
    silent_hosts: usize,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let generation = config.dashboard_config(None).generation;
    info!(
        "Generating {} hosts x {} reports (generation {}), {} silent hosts",
        hosts, reports_per_host, generation, silent_hosts
    );

    let fixture = generate_fixture(generation, hosts, reports_per_host, silent_hosts);
    write_fixture(&output, &fixture)?;

    println!(
        "✅ Test data written to: {} ({} reports, {} hosts)",
        output.display(),
        fixture.reports.len(),
        hosts + silent_hosts
    );
    Ok(())
}
