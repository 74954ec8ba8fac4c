//! Fleet-wide totals over the hosts shown on the dashboard.

use serde::Serialize;

use crate::classifier::ClassifiedReport;

/// Totals over every host that produced a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetAggregate {
    pub total_hosts: u64,
    pub total_cores: u64,
    pub total_physmem_kb: u64,
}

/// Terminal fold over classified rows.
///
/// Totals are only available from [`FleetAggregator::finish`], which consumes
/// the aggregator.
#[derive(Debug, Default)]
pub struct FleetAggregator {
    totals: FleetAggregate,
}

impl FleetAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, report: &ClassifiedReport) {
        self.totals.total_hosts = self.totals.total_hosts.saturating_add(1);
        self.totals.total_cores = self
            .totals
            .total_cores
            .saturating_add(u64::from(report.cores));
        self.totals.total_physmem_kb = self
            .totals
            .total_physmem_kb
            .saturating_add(report.physmem_kb);
    }

    pub fn finish(self) -> FleetAggregate {
        self.totals
    }
}

impl<'a> Extend<&'a ClassifiedReport> for FleetAggregator {
    fn extend<T: IntoIterator<Item = &'a ClassifiedReport>>(&mut self, iter: T) {
        for report in iter {
            self.add(report);
        }
    }
}
