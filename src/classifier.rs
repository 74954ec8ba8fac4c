//! Threshold classification of report metrics.
//!
//! Two rule families are applied:
//!
//! - **Capacity-relative** (load averages): compared against the host's core
//!   count scaled by the configured ratios.
//! - **Fixed-percentage** (swap used, disk utilization): compared against
//!   constant percentages.
//!
//! All comparisons are strict `>`, so a value sitting exactly on a threshold
//! stays in the lower tier.
//!
//! # Usage
//!
//! ```rust
//! use hostmon_dashboard::{Classifier, Severity, ThresholdConfig};
//!
//! let classifier = Classifier::new(ThresholdConfig::default());
//!
//! assert_eq!(classifier.classify_load(5.0, 4), Severity::Critical);
//! assert_eq!(classifier.classify_load(2.0, 4), Severity::Normal);
//! assert_eq!(classifier.classify_percent(66.0), Severity::Warning);
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::FormatError;
use crate::report::{parse_metric, Report};
use crate::thresholds::ThresholdConfig;

/// Severity tier of a metric. Ordered `Normal < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric value together with its tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedMetric {
    pub value: f64,
    pub severity: Severity,
}

/// Disk utilization of a single mount, classified with the fixed-percentage rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedMount {
    pub mount: String,
    pub used_pct: ClassifiedMetric,
}

/// A normalized report with every threshold metric classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedReport {
    pub host: String,
    pub timestamp: i64,
    pub kernel: Option<String>,
    pub release: Option<String>,
    pub uptime_seconds: Option<f64>,
    /// Uptime rendered as H:M:S.
    pub uptime: Option<String>,
    pub cores: u32,
    pub physmem_kb: u64,
    pub load1: ClassifiedMetric,
    pub load5: ClassifiedMetric,
    pub load15: ClassifiedMetric,
    pub swap_pct: ClassifiedMetric,
    /// `None` when the host sent no disk report.
    pub disk_pct: Option<ClassifiedMetric>,
    pub disk_mounts: Vec<ClassifiedMount>,
    /// Worst tier across the row.
    pub overall: Severity,
}

/// Stateless classifier built from a threshold configuration.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: ThresholdConfig,
    uptime_carry: bool,
}

impl Classifier {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self {
            thresholds,
            uptime_carry: false,
        }
    }

    /// Renders uptimes with carrying H:M:S instead of per-component rounding.
    pub fn with_uptime_carry(mut self, carry: bool) -> Self {
        self.uptime_carry = carry;
        self
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Classifies a load average against the host's core count.
    ///
    /// A host reporting zero cores has no usable reference and is Critical.
    pub fn classify_load(&self, load: f64, cores: u32) -> Severity {
        classify_relative(
            load,
            f64::from(cores),
            self.thresholds.load_critical_ratio,
            self.thresholds.load_warning_ratio,
        )
    }

    /// Classifies a swap or disk utilization percentage.
    pub fn classify_percent(&self, pct: f64) -> Severity {
        if pct > self.thresholds.pct_critical {
            Severity::Critical
        } else if pct > self.thresholds.pct_warning {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }

    /// Parses a textual load value then classifies it.
    pub fn classify_load_text(&self, load: &str, cores: u32) -> Result<Severity, FormatError> {
        let value = parse_metric("load", load)?;
        Ok(self.classify_load(value, cores))
    }

    /// Parses a textual percentage then classifies it.
    pub fn classify_percent_text(&self, pct: &str) -> Result<Severity, FormatError> {
        let value = parse_metric("pct", pct)?;
        Ok(self.classify_percent(value))
    }

    /// Classifies every threshold metric of a report.
    pub fn classify(&self, report: &Report) -> ClassifiedReport {
        let load = |value: f64| ClassifiedMetric {
            value,
            severity: self.classify_load(value, report.cores),
        };
        let pct = |value: f64| ClassifiedMetric {
            value,
            severity: self.classify_percent(value),
        };

        let load1 = load(report.load1);
        let load5 = load(report.load5);
        let load15 = load(report.load15);
        let swap_pct = pct(report.swap_pct);
        let disk_pct = report.disk_pct.map(pct);

        let disk_mounts: Vec<ClassifiedMount> = report
            .disk_mounts
            .iter()
            .map(|m| ClassifiedMount {
                mount: m.mount.clone(),
                used_pct: pct(m.used_pct),
            })
            .collect();

        // Worst tier of the row
        let overall = [Some(load1), Some(load5), Some(load15), Some(swap_pct), disk_pct]
            .iter()
            .flatten()
            .map(|m| m.severity)
            .max()
            .unwrap_or_default();

        ClassifiedReport {
            host: report.host.clone(),
            timestamp: report.timestamp,
            kernel: report.kernel.clone(),
            release: report.release.clone(),
            uptime_seconds: report.uptime.map(|u| u.seconds),
            uptime: report.uptime.map(|u| u.render(self.uptime_carry)),
            cores: report.cores,
            physmem_kb: report.physmem_kb,
            load1,
            load5,
            load15,
            swap_pct,
            disk_pct,
            disk_mounts,
            overall,
        }
    }
}

/// Capacity-relative rule: `value > reference * critical_ratio` is Critical,
/// `value > reference * warning_ratio` is Warning. A reference of zero or less
/// is Critical outright.
fn classify_relative(value: f64, reference: f64, critical_ratio: f64, warning_ratio: f64) -> Severity {
    if reference <= 0.0 {
        return Severity::Critical;
    }
    if value > reference * critical_ratio {
        Severity::Critical
    } else if value > reference * warning_ratio {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{MountUsage, Uptime};

    fn classifier() -> Classifier {
        Classifier::new(ThresholdConfig::default())
    }

    fn report(cores: u32, load1: f64, swap_pct: f64, disk_pct: f64) -> Report {
        Report {
            timestamp: 1_700_000_000,
            host: "alpha".to_string(),
            kernel: None,
            release: None,
            uptime: None,
            cores,
            physmem_kb: 8_192_000,
            load1,
            load5: 0.0,
            load15: 0.0,
            swap_pct,
            disk_pct: Some(disk_pct),
            disk_mounts: Vec::new(),
        }
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Normal < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert_eq!(Severity::default(), Severity::Normal);
    }

    #[test]
    fn test_load_boundaries() {
        let c = classifier();
        // value == reference stays Warning
        assert_eq!(c.classify_load(4.0, 4), Severity::Warning);
        assert_eq!(c.classify_load(4.01, 4), Severity::Critical);
        // value == reference / 2 stays Normal
        assert_eq!(c.classify_load(2.0, 4), Severity::Normal);
        assert_eq!(c.classify_load(2.01, 4), Severity::Warning);
        assert_eq!(c.classify_load(0.0, 4), Severity::Normal);
    }

    #[test]
    fn test_zero_cores_is_critical() {
        let c = classifier();
        assert_eq!(c.classify_load(0.1, 0), Severity::Critical);
        assert_eq!(c.classify_load(0.0, 0), Severity::Critical);
    }

    #[test]
    fn test_percent_boundaries() {
        let c = classifier();
        assert_eq!(c.classify_percent(66.0), Severity::Warning);
        assert_eq!(c.classify_percent(66.01), Severity::Critical);
        assert_eq!(c.classify_percent(10.0), Severity::Normal);
        assert_eq!(c.classify_percent(10.01), Severity::Warning);
        assert_eq!(c.classify_percent(0.0), Severity::Normal);
        assert_eq!(c.classify_percent(150.0), Severity::Critical);
    }

    #[test]
    fn test_custom_ratios() {
        let c = Classifier::new(ThresholdConfig {
            load_critical_ratio: 2.0,
            load_warning_ratio: 1.0,
            pct_critical: 90.0,
            pct_warning: 50.0,
        });
        assert_eq!(c.classify_load(5.0, 4), Severity::Warning);
        assert_eq!(c.classify_load(8.5, 4), Severity::Critical);
        assert_eq!(c.classify_percent(66.01), Severity::Warning);
    }

    #[test]
    fn test_text_entry_points() {
        let c = classifier();
        assert_eq!(c.classify_load_text("5.000000", 4).unwrap(), Severity::Critical);
        assert_eq!(c.classify_percent_text(" 12.5 ").unwrap(), Severity::Warning);
        assert!(matches!(
            c.classify_load_text("n/a", 4),
            Err(FormatError::InvalidNumber { .. })
        ));
        assert!(c.classify_percent_text("").is_err());
    }

    #[test]
    fn test_classify_report() {
        let c = classifier();
        let classified = c.classify(&report(4, 5.0, 5.0, 40.0));
        assert_eq!(classified.load1.severity, Severity::Critical);
        assert_eq!(classified.load5.severity, Severity::Normal);
        assert_eq!(classified.swap_pct.severity, Severity::Normal);
        assert_eq!(classified.disk_pct.unwrap().severity, Severity::Warning);
        assert_eq!(classified.overall, Severity::Critical);
        assert_eq!(classified.cores, 4);
        assert_eq!(classified.physmem_kb, 8_192_000);
    }

    #[test]
    fn test_missing_disk_report() {
        let mut r = report(4, 1.0, 5.0, 0.0);
        r.disk_pct = None;
        let classified = classifier().classify(&r);
        assert!(classified.disk_pct.is_none());
        assert!(classified.disk_mounts.is_empty());
        assert_eq!(classified.overall, Severity::Normal);
    }

    #[test]
    fn test_overall_normal() {
        let classified = classifier().classify(&report(8, 1.0, 0.0, 5.0));
        assert_eq!(classified.overall, Severity::Normal);
    }

    #[test]
    fn test_mounts_and_uptime() {
        let mut r = report(4, 1.0, 0.0, 70.0);
        r.disk_mounts = vec![
            MountUsage {
                mount: "/".to_string(),
                used_pct: 5.0,
            },
            MountUsage {
                mount: "/home".to_string(),
                used_pct: 70.0,
            },
        ];
        r.uptime = Some(Uptime { seconds: 3576.0 });

        let classified = classifier().classify(&r);
        assert_eq!(classified.disk_mounts[0].used_pct.severity, Severity::Normal);
        assert_eq!(classified.disk_mounts[1].used_pct.severity, Severity::Critical);
        assert_eq!(classified.uptime.as_deref(), Some("1:60:36"));

        let classified = classifier().with_uptime_carry(true).classify(&r);
        assert_eq!(classified.uptime.as_deref(), Some("0:59:36"));
        assert_eq!(classified.uptime_seconds, Some(3576.0));
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");

        let metric = ClassifiedMetric {
            value: 12.5,
            severity: Severity::Warning,
        };
        let json = serde_json::to_string(&metric).unwrap();
        assert!(json.contains("12.5"));
        assert!(json.contains("warning"));
    }
}
