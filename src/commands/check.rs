//! Check command implementation.
//!
//! Validates configuration and the report history file.

use hostmon_dashboard::render;

use crate::commands::render::open_store;
use crate::config::{validate_effective_config, Config};

/// Validates configuration and, when configured, the reports file.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Host Mon Dashboard - Check");
    println!("=============================");

    let mut all_ok = true;

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            let t = &config.thresholds;
            println!("   ✅ Configuration is valid");
            println!(
                "   ├─ Load: warning > {} x cores, critical > {} x cores",
                t.load_warning_ratio, t.load_critical_ratio
            );
            println!(
                "   └─ Swap/disk: warning > {}%, critical > {}%",
                t.pct_warning, t.pct_critical
            );
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    // Check reports file
    println!("\n📁 Checking reports file...");
    if config.reports_file.is_none() {
        println!("   ⚠️  No reports file configured, skipping");
    } else {
        match open_store(config) {
            Ok((store, fixture_generation)) => {
                let dashboard_config = config.dashboard_config(fixture_generation);
                println!("   ✅ Loaded {} reports", store.report_count());
                match render(&store, &dashboard_config) {
                    Ok(snapshot) => {
                        println!(
                            "   ✅ Trial render (generation {}): {} of {} hosts shown",
                            dashboard_config.generation,
                            snapshot.rows.len(),
                            snapshot.hosts_listed
                        );
                        if !snapshot.skipped.is_empty() {
                            println!(
                                "   ⚠️  {} latest reports do not match generation {}",
                                snapshot.skipped.len(),
                                dashboard_config.generation
                            );
                            for skipped in &snapshot.skipped {
                                println!("      ├─ {}: {}", skipped.host, skipped.error);
                            }
                        }
                    }
                    Err(e) => {
                        println!("   ❌ Trial render failed: {}", e);
                        all_ok = false;
                    }
                }
            }
            Err(e) => {
                println!("   ❌ {:#}", e);
                all_ok = false;
            }
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review the output above");
        std::process::exit(1);
    }
}
