//! Report rows and their normalization into one canonical record.
//!
//! The report store hands out rows as positional text cells, the way
//! `SELECT * FROM reports` returns them. Three deployment generations wrote
//! three different column layouts; the deployment is configured with the
//! generation it uses and [`normalize`] maps the row onto named fields.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FormatError;

/// One column of a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    Host,
    Kernel,
    Release,
    Uptime,
    Cores,
    PhysmemKb,
    Load1,
    Load5,
    Load15,
    SwapPct,
    Disk,
}

impl Column {
    /// Field name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::Host => "host",
            Column::Kernel => "kernel",
            Column::Release => "release",
            Column::Uptime => "uptime",
            Column::Cores => "cores",
            Column::PhysmemKb => "physmem_kb",
            Column::Load1 => "load1",
            Column::Load5 => "load5",
            Column::Load15 => "load15",
            Column::SwapPct => "swap_pct",
            Column::Disk => "disk",
        }
    }
}

const LAYOUT_V1: &[Column] = &[
    Column::Timestamp,
    Column::Host,
    Column::Cores,
    Column::PhysmemKb,
    Column::Load1,
    Column::Load5,
    Column::Load15,
    Column::SwapPct,
    Column::Disk,
];

const LAYOUT_V2: &[Column] = &[
    Column::Timestamp,
    Column::Host,
    Column::Kernel,
    Column::Cores,
    Column::PhysmemKb,
    Column::Load1,
    Column::Load5,
    Column::Load15,
    Column::SwapPct,
    Column::Disk,
];

const LAYOUT_V3: &[Column] = &[
    Column::Timestamp,
    Column::Host,
    Column::Kernel,
    Column::Release,
    Column::Uptime,
    Column::Cores,
    Column::PhysmemKb,
    Column::Load1,
    Column::Load5,
    Column::Load15,
    Column::SwapPct,
    Column::Disk,
];

/// Deployment generation of the `reports` table.
///
/// Serialized as the plain generation number (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SchemaGeneration {
    /// host, cores, physmem, loads, swap, disk.
    V1,
    /// Adds the kernel name before cores.
    V2,
    /// Adds kernel release and uptime seconds before cores.
    V3,
}

impl SchemaGeneration {
    /// Column layout of a row in this generation, timestamp first.
    pub fn layout(self) -> &'static [Column] {
        match self {
            SchemaGeneration::V1 => LAYOUT_V1,
            SchemaGeneration::V2 => LAYOUT_V2,
            SchemaGeneration::V3 => LAYOUT_V3,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            SchemaGeneration::V1 => 1,
            SchemaGeneration::V2 => 2,
            SchemaGeneration::V3 => 3,
        }
    }
}

impl TryFrom<u8> for SchemaGeneration {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SchemaGeneration::V1),
            2 => Ok(SchemaGeneration::V2),
            3 => Ok(SchemaGeneration::V3),
            other => Err(format!(
                "unknown schema generation {}, expected 1, 2 or 3",
                other
            )),
        }
    }
}

impl From<SchemaGeneration> for u8 {
    fn from(generation: SchemaGeneration) -> Self {
        generation.number()
    }
}

impl fmt::Display for SchemaGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A raw report row: untyped text cells, timestamp first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportRow {
    pub cells: Vec<String>,
}

impl ReportRow {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Report timestamp (unix seconds) from the first cell.
    pub fn timestamp(&self) -> Result<i64, FormatError> {
        let cell = self
            .cells
            .first()
            .map(|c| c.trim())
            .ok_or(FormatError::Empty { field: "timestamp" })?;
        cell.parse::<i64>()
            .map_err(|_| FormatError::InvalidNumber {
                field: "timestamp",
                value: cell.to_string(),
            })
    }

    /// Host name from the second cell. Every generation stores it there.
    pub fn host(&self) -> Result<&str, FormatError> {
        match self.cells.get(1).map(|c| c.trim()) {
            Some(host) if !host.is_empty() => Ok(host),
            _ => Err(FormatError::Empty { field: "host" }),
        }
    }
}

/// Utilization of one mount point from a per-mount disk report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountUsage {
    pub mount: String,
    pub used_pct: f64,
}

/// Hours, minutes and seconds of an uptime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Host uptime in raw seconds as reported by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uptime {
    pub seconds: f64,
}

impl Uptime {
    /// Splits the uptime into H:M:S.
    ///
    /// Without `carry`, each component is rounded on its own:
    /// `round(s / 3600)`, `round((s mod 3600) / 60)`, `round(s mod 60)`.
    /// Minutes and seconds can come out as 60 and hours can round up
    /// (5400s renders as 2:30:00). With `carry`, total seconds are rounded
    /// once and divided down.
    pub fn hms(self, carry: bool) -> Hms {
        let secs = self.seconds.max(0.0);
        if carry {
            let total = secs.round() as u64;
            Hms {
                hours: total / 3600,
                minutes: (total % 3600) / 60,
                seconds: total % 60,
            }
        } else {
            Hms {
                hours: (secs / 3600.0).round() as u64,
                minutes: ((secs % 3600.0) / 60.0).round() as u64,
                seconds: (secs % 60.0).round() as u64,
            }
        }
    }

    pub fn render(self, carry: bool) -> String {
        self.hms(carry).to_string()
    }
}

/// Canonical in-memory shape of one report, whatever generation wrote it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub timestamp: i64,
    pub host: String,
    pub kernel: Option<String>,
    pub release: Option<String>,
    pub uptime: Option<Uptime>,
    pub cores: u32,
    pub physmem_kb: u64,
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    pub swap_pct: f64,
    /// Highest utilization in the disk report. `None` when the agent sent an
    /// empty disk report.
    pub disk_pct: Option<f64>,
    /// Per-mount entries when the disk report lists mounts, in report order.
    pub disk_mounts: Vec<MountUsage>,
}

/// Normalizes a raw row written by `generation` into a [`Report`].
pub fn normalize(row: &ReportRow, generation: SchemaGeneration) -> Result<Report, FormatError> {
    let layout = generation.layout();
    if row.cells.len() != layout.len() {
        return Err(FormatError::ColumnCount {
            generation: generation.number(),
            expected: layout.len(),
            actual: row.cells.len(),
        });
    }

    let cell = |column: Column| cell_for(layout, row, column);
    let required = |column: Column| {
        cell_for(layout, row, column).ok_or(FormatError::Empty {
            field: column.name(),
        })
    };

    let timestamp = row.timestamp()?;
    let host = row.host()?.to_string();
    let kernel = cell(Column::Kernel).map(str::to_string);
    let release = cell(Column::Release).map(str::to_string);
    let uptime = match cell(Column::Uptime) {
        Some(text) => parse_uptime(text)?,
        None => None,
    };

    let cores = parse_count(Column::Cores, required(Column::Cores)?)?;
    let cores = u32::try_from(cores).map_err(|_| FormatError::InvalidNumber {
        field: Column::Cores.name(),
        value: cores.to_string(),
    })?;
    let physmem_kb = parse_count(Column::PhysmemKb, required(Column::PhysmemKb)?)?;

    let load1 = parse_load(Column::Load1, required(Column::Load1)?)?;
    let load5 = parse_load(Column::Load5, required(Column::Load5)?)?;
    let load15 = parse_load(Column::Load15, required(Column::Load15)?)?;
    let swap_pct = parse_metric(Column::SwapPct.name(), required(Column::SwapPct)?)?;
    let (disk_pct, disk_mounts) = parse_disk(required(Column::Disk)?)?;

    Ok(Report {
        timestamp,
        host,
        kernel,
        release,
        uptime,
        cores,
        physmem_kb,
        load1,
        load5,
        load15,
        swap_pct,
        disk_pct,
        disk_mounts,
    })
}

fn cell_for<'a>(layout: &[Column], row: &'a ReportRow, column: Column) -> Option<&'a str> {
    layout
        .iter()
        .position(|c| *c == column)
        .and_then(|idx| row.cells.get(idx))
        .map(|c| c.trim())
}

/// Parses a metric stored as text. Non-numeric and non-finite values are rejected.
pub fn parse_metric(field: &'static str, text: &str) -> Result<f64, FormatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FormatError::Empty { field });
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormatError::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

fn parse_count(column: Column, text: &str) -> Result<u64, FormatError> {
    if text.is_empty() {
        return Err(FormatError::Empty {
            field: column.name(),
        });
    }
    text.parse::<u64>().map_err(|_| FormatError::InvalidNumber {
        field: column.name(),
        value: text.to_string(),
    })
}

fn parse_load(column: Column, text: &str) -> Result<f64, FormatError> {
    let value = parse_metric(column.name(), text)?;
    if value < 0.0 {
        return Err(FormatError::Negative {
            field: column.name(),
            value,
        });
    }
    Ok(value)
}

/// The agent writes "unknown" when /proc/uptime could not be read.
fn parse_uptime(text: &str) -> Result<Option<Uptime>, FormatError> {
    if text.is_empty() || text.eq_ignore_ascii_case("unknown") {
        return Ok(None);
    }
    let seconds = parse_metric(Column::Uptime.name(), text)?;
    if seconds < 0.0 {
        return Err(FormatError::Negative {
            field: Column::Uptime.name(),
            value: seconds,
        });
    }
    Ok(Some(Uptime { seconds }))
}

/// Disk cell: a single percentage, or `mount pct` pairs such as `"/ 12 /home 40"`.
/// The agent writes an empty cell when `df` fails.
fn parse_disk(text: &str) -> Result<(Option<f64>, Vec<MountUsage>), FormatError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.len() {
        0 => Ok((None, Vec::new())),
        1 => Ok((
            Some(parse_metric("disk_pct", tokens[0].trim_end_matches('%'))?),
            Vec::new(),
        )),
        n if n % 2 != 0 => Err(FormatError::DiskReport(text.to_string())),
        _ => {
            let mut mounts = Vec::with_capacity(tokens.len() / 2);
            for pair in tokens.chunks(2) {
                let used_pct = parse_metric("disk_pct", pair[1].trim_end_matches('%'))
                    .map_err(|_| FormatError::DiskReport(text.to_string()))?;
                mounts.push(MountUsage {
                    mount: pair[0].to_string(),
                    used_pct,
                });
            }
            let disk_pct = mounts
                .iter()
                .map(|m| m.used_pct)
                .fold(f64::NEG_INFINITY, f64::max);
            Ok((Some(disk_pct), mounts))
        }
    }
}
