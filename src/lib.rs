//! Host Mon Dashboard Library
//!
//! This library provides the decision logic behind the host monitor dashboard:
//! picking the latest report per host, classifying its metrics into severity
//! tiers and folding fleet-wide totals. Page markup, HTTP serving and database
//! access stay with the caller, which plugs in through the [`ReportStore`] trait.
//!
//! # Features
//!
//! - **Schema Generations**: Rows written by all three deployment generations
//!   normalize into one [`Report`]
//! - **Configurable Thresholds**: Load ratios against core count, fixed
//!   percentages for swap and disk
//! - **Fleet Totals**: Host, core and physical memory totals over reporting hosts
//! - **Deterministic Order**: Rows follow the store's host listing
//!
//! # Usage
//!
//! ```rust
//! use hostmon_dashboard::{render, DashboardConfig, MemoryReportStore, ReportRow, SchemaGeneration, Severity};
//!
//! let mut store = MemoryReportStore::new();
//! store
//!     .append(ReportRow::new([
//!         "1700000000", "a", "4", "16384000", "5.0", "3.0", "1.0", "0.0", "12",
//!     ]))
//!     .unwrap();
//! store.register_host("b");
//!
//! let config = DashboardConfig {
//!     generation: SchemaGeneration::V1,
//!     ..DashboardConfig::default()
//! };
//! let snapshot = render(&store, &config).unwrap();
//!
//! assert_eq!(snapshot.rows.len(), 1);
//! assert_eq!(snapshot.rows[0].report.load1.severity, Severity::Critical);
//! assert_eq!(snapshot.aggregate.total_hosts, 1);
//! assert_eq!(snapshot.aggregate.total_cores, 4);
//! ```

pub mod aggregate;
pub mod classifier;
pub mod dashboard;
pub mod error;
pub mod report;
pub mod store;
pub mod thresholds;

// Re-export main types for convenience
pub use aggregate::{FleetAggregate, FleetAggregator};
pub use classifier::{ClassifiedMetric, ClassifiedMount, ClassifiedReport, Classifier, Severity};
pub use dashboard::{render, DashboardRow, DashboardSnapshot, SkippedRow};
pub use error::{DashboardError, FormatError, StoreError};
pub use report::{normalize, MountUsage, Report, ReportRow, SchemaGeneration, Uptime};
pub use store::{select_latest, MemoryReportStore, ReportFixture, ReportStore};
pub use thresholds::{DashboardConfig, ThresholdConfig};
