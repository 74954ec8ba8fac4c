//! Pipeline driver: one pass over the host listing per render.
//!
//! For each listed host the latest report is fetched, normalized, classified
//! and folded into the fleet totals. Rows come out in listing order. A host
//! without a report produces no row and adds nothing to the totals. A row that
//! fails to normalize is skipped and recorded; a store failure aborts the
//! render with no partial result.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{FleetAggregate, FleetAggregator};
use crate::classifier::{ClassifiedReport, Classifier};
use crate::error::DashboardError;
use crate::report::{normalize, SchemaGeneration};
use crate::store::ReportStore;
use crate::thresholds::DashboardConfig;

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    /// Index of the host in the listing, counting hosts without rows too.
    /// Row shading alternates on this.
    pub position: usize,
    #[serde(flatten)]
    pub report: ClassifiedReport,
}

/// A host whose latest report could not be normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub host: String,
    pub position: usize,
    pub error: String,
}

/// Everything the page assembler needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub generation: SchemaGeneration,
    pub hosts_listed: usize,
    pub rows: Vec<DashboardRow>,
    pub aggregate: FleetAggregate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRow>,
    /// Hosts without any report. Only filled with `report_missing_hosts`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// Renders the dashboard from `store`.
pub fn render<S>(store: &S, config: &DashboardConfig) -> Result<DashboardSnapshot, DashboardError>
where
    S: ReportStore + ?Sized,
{
    let classifier =
        Classifier::new(config.thresholds.clone()).with_uptime_carry(config.uptime_carry);
    let mut aggregator = FleetAggregator::new();

    let latest = store.latest_reports()?;
    let hosts_listed = latest.len();
    info!(
        "Rendering dashboard for {} hosts (schema generation {})",
        hosts_listed, config.generation
    );

    let mut rows = Vec::with_capacity(hosts_listed);
    let mut skipped = Vec::new();
    let mut missing = Vec::new();

    for (position, (host, row)) in latest.into_iter().enumerate() {
        let Some(row) = row else {
            debug!("Host '{}' has no reports, leaving it off the dashboard", host);
            if config.report_missing_hosts {
                missing.push(host);
            }
            continue;
        };

        match normalize(&row, config.generation) {
            Ok(report) => {
                let classified = classifier.classify(&report);
                debug!(
                    "Host '{}' classified: overall={}",
                    classified.host, classified.overall
                );
                aggregator.add(&classified);
                rows.push(DashboardRow {
                    position,
                    report: classified,
                });
            }
            Err(e) => {
                warn!("Skipping latest report of host '{}': {}", host, e);
                skipped.push(SkippedRow {
                    host,
                    position,
                    error: e.to_string(),
                });
            }
        }
    }

    let aggregate = aggregator.finish();
    info!(
        "{} total hosts, {} total cores, {} kB total physical memory ({} skipped)",
        aggregate.total_hosts,
        aggregate.total_cores,
        aggregate.total_physmem_kb,
        skipped.len()
    );

    Ok(DashboardSnapshot {
        generated_at: Utc::now(),
        generation: config.generation,
        hosts_listed,
        rows,
        aggregate,
        skipped,
        missing,
    })
}
