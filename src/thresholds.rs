//! Configuration types for threshold classification and dashboard rendering.
//!
//! This module provides the configuration structures handed to the classifier
//! and the pipeline driver at construction time.

use serde::{Deserialize, Serialize};

use crate::report::SchemaGeneration;

/// Threshold configuration for the two rule families.
///
/// Load averages are compared against the host's core count scaled by the
/// ratios. Swap and disk utilization are compared against fixed percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Critical when load > cores * load_critical_ratio.
    pub load_critical_ratio: f64,
    /// Warning when load > cores * load_warning_ratio.
    pub load_warning_ratio: f64,
    /// Critical when swap/disk percent > pct_critical.
    pub pct_critical: f64,
    /// Warning when swap/disk percent > pct_warning.
    pub pct_warning: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            load_critical_ratio: 1.0,
            load_warning_ratio: 0.5,
            pct_critical: 66.0,
            pct_warning: 10.0,
        }
    }
}

impl ThresholdConfig {
    /// Checks that all thresholds are usable and ordered.
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("load_critical_ratio", self.load_critical_ratio),
            ("load_warning_ratio", self.load_warning_ratio),
            ("pct_critical", self.pct_critical),
            ("pct_warning", self.pct_warning),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "threshold '{}' must be a finite, non-negative number (got {})",
                    name, value
                ));
            }
        }

        if self.load_warning_ratio > self.load_critical_ratio {
            return Err(format!(
                "load_warning_ratio ({}) must not exceed load_critical_ratio ({})",
                self.load_warning_ratio, self.load_critical_ratio
            ));
        }
        if self.pct_warning > self.pct_critical {
            return Err(format!(
                "pct_warning ({}) must not exceed pct_critical ({})",
                self.pct_warning, self.pct_critical
            ));
        }
        Ok(())
    }
}

/// Everything one dashboard render needs besides the report store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Column layout the report store returns.
    pub generation: SchemaGeneration,
    pub thresholds: ThresholdConfig,
    /// Round total uptime seconds once and carry into minutes/hours instead of
    /// rounding each H:M:S component on its own.
    pub uptime_carry: bool,
    /// List hosts without any report in the snapshot (never as rows).
    pub report_missing_hosts: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            generation: SchemaGeneration::V3,
            thresholds: ThresholdConfig::default(),
            uptime_carry: false,
            report_missing_hosts: false,
        }
    }
}
