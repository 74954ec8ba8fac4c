//! Report store adapter and latest-report selection.
//!
//! The store owns report history; the dashboard only reads it. Reports are
//! append-only and the current report of a host is the one with the highest
//! timestamp.

use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{FormatError, StoreError};
use crate::report::{ReportRow, SchemaGeneration};

/// Source of hosts and their reports.
pub trait ReportStore {
    /// Hosts in listing order. This order is the row order of the dashboard.
    fn list_hosts(&self) -> Result<Vec<String>, StoreError>;

    /// Most recent report of `host`, or `None` if it never reported.
    fn latest_report(&self, host: &str) -> Result<Option<ReportRow>, StoreError>;

    /// Latest report of every listed host, in listing order.
    ///
    /// Stores that can fetch everything in one query should override this.
    fn latest_reports(&self) -> Result<Vec<(String, Option<ReportRow>)>, StoreError> {
        self.list_hosts()?
            .into_iter()
            .map(|host| {
                let report = self.latest_report(&host)?;
                Ok((host, report))
            })
            .collect()
    }
}

/// Picks the row with the highest timestamp. On equal timestamps the row that
/// comes later wins. Rows whose timestamp cannot be parsed are never selected.
pub fn select_latest<'a, I>(rows: I) -> Option<&'a ReportRow>
where
    I: IntoIterator<Item = &'a ReportRow>,
{
    rows.into_iter()
        .filter_map(|row| row.timestamp().ok().map(|ts| (ts, row)))
        .max_by_key(|(ts, _)| *ts)
        .map(|(_, row)| row)
}

/// Serialized form of a report history, as loaded by the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFixture {
    /// Column layout of `reports`, if the file records it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<SchemaGeneration>,
    /// Registered hosts, including hosts that never reported.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Raw report rows in insertion order.
    #[serde(default)]
    pub reports: Vec<ReportRow>,
}

/// In-memory append-only report history.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    hosts: BTreeSet<String>,
    history: HashMap<String, Vec<ReportRow>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a fixture, registering hosts before reports.
    pub fn from_fixture(fixture: ReportFixture) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for host in fixture.hosts {
            store.register_host(host);
        }
        for (index, row) in fixture.reports.into_iter().enumerate() {
            store
                .append(row)
                .map_err(|source| StoreError::InvalidRecord { index, source })?;
        }
        debug!(
            "Report store loaded: {} hosts, {} reports",
            store.hosts.len(),
            store.report_count()
        );
        Ok(store)
    }

    /// Adds a host to the listing. Registering twice is a no-op.
    pub fn register_host(&mut self, host: impl Into<String>) {
        self.hosts.insert(host.into());
    }

    /// Appends a report to the history of its host, registering the host on
    /// its first report.
    pub fn append(&mut self, row: ReportRow) -> Result<(), FormatError> {
        row.timestamp()?;
        let host = row.host()?.to_string();
        if !self.hosts.contains(&host) {
            debug!("Registering host '{}' on first report", host);
            self.hosts.insert(host.clone());
        }
        self.history.entry(host).or_default().push(row);
        Ok(())
    }

    /// Every report of `host` in insertion order.
    pub fn history(&self, host: &str) -> &[ReportRow] {
        self.history.get(host).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn report_count(&self) -> usize {
        self.history.values().map(Vec::len).sum()
    }
}

impl ReportStore for MemoryReportStore {
    fn list_hosts(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.hosts.iter().cloned().collect())
    }

    fn latest_report(&self, host: &str) -> Result<Option<ReportRow>, StoreError> {
        Ok(select_latest(self.history(host)).cloned())
    }
}
