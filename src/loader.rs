//! KPI Table Loader - reads the KPI sheet into an immutable table
//!
//! The sheet is materialized as a polars `DataFrame` of text columns, blank
//! cells become nulls, the whole frame is forward-filled and every scenario
//! column is cleaned into `Float64`. Cells that do not survive cleaning are
//! kept as missing values instead of failing the load.

use crate::error::{DashboardError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use lazy_static::lazy_static;
use polars::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use strsim::jaro_winkler;
use tracing::{debug, info, warn};

pub const GROUP_COLUMN: &str = "Group";
pub const KPI_COLUMN: &str = "KPI";

/// Scenario columns, in the order they are charted.
pub const SCENARIOS: [&str; 5] = [
    "Baseline 2025",
    "Baseline 2050",
    "Strategy 1",
    "Strategy 2",
    "Strategy 3",
];

pub const DEFAULT_SHEET: &str = "KPI";

lazy_static! {
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9\-,.]").unwrap();
}

/// One KPI row after cleaning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRecord {
    pub group: String,
    /// Display name, kept verbatim (surrounding whitespace included)
    pub kpi_name: String,
    /// Values in `SCENARIOS` order; `None` when the cell was empty or unparseable
    pub values: [Option<f64>; 5],
}

/// The loaded KPI record set. Built once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct KpiTable {
    records: Vec<KpiRecord>,
}

impl KpiTable {
    pub fn from_records(records: Vec<KpiRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[KpiRecord] {
        &self.records
    }

    /// Exact-name lookup. Whitespace is significant.
    pub fn find(&self, kpi_name: &str) -> Option<&KpiRecord> {
        self.records.iter().find(|r| r.kpi_name == kpi_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads a `KpiTable` from a spreadsheet or CSV export
pub struct KpiTableLoader {
    sheet: String,
}

impl Default for KpiTableLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET)
    }
}

impl KpiTableLoader {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<KpiTable> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DashboardError::MissingSource(path.to_path_buf()));
        }

        let df = self.read_frame(path)?;
        let table = table_from_frame(df)?;

        info!(
            "Loaded {} KPI rows from {} (sheet '{}')",
            table.len(),
            path.display(),
            self.sheet
        );
        Ok(table)
    }

    fn read_frame(&self, path: &Path) -> Result<DataFrame> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
                read_workbook(path, &self.sheet)
            }
            Some("csv") => read_csv(path),
            _ => Err(DashboardError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read one worksheet into a frame of text columns
pub fn read_workbook(path: &Path, sheet: &str) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range(sheet)?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string()).collect(),
        None => Vec::new(),
    };

    let body: Vec<Vec<Option<String>>> = rows
        .map(|cells| cells.iter().map(cell_text).collect())
        .collect();

    frame_from_rows(header, body)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}

/// Read a CSV export with every column kept as text
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;
    Ok(df)
}

/// Build a text frame from a header row and body rows.
/// Short rows are padded with nulls, unnamed or duplicate headers get a suffix.
pub fn frame_from_rows(header: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<DataFrame> {
    let width = rows
        .iter()
        .map(|r| r.len())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(width);
    for idx in 0..width {
        let raw = header.get(idx).map(|h| h.as_str()).unwrap_or("");
        let mut name = if raw.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            raw.to_string()
        };
        if used.contains(&name) {
            let base = name.clone();
            let mut suffix = 2usize;
            while used.contains(&format!("{}_{}", base, suffix)) {
                suffix += 1;
            }
            name = format!("{}_{}", base, suffix);
        }
        used.insert(name.clone());
        names.push(name);
    }

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(rows.len()); width];
    for row in rows {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().flatten());
        }
    }

    let series: Vec<Series> = names
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name.as_str(), values))
        .collect();

    Ok(DataFrame::new(series)?)
}

/// Validate, forward-fill and clean a raw frame into a `KpiTable`
pub fn table_from_frame(df: DataFrame) -> Result<KpiTable> {
    let mut required = vec![GROUP_COLUMN, KPI_COLUMN];
    required.extend_from_slice(&SCENARIOS);
    ensure_columns(&df, &required)?;

    let mut df = df.select(required.iter().copied())?;
    for name in &required {
        let text = blank_to_null(df.column(name)?)?;
        df.with_column(text)?;
    }

    let mut df = df.fill_null(FillNullStrategy::Forward(None))?;

    for scenario in SCENARIOS {
        let raw = df.column(scenario)?.str()?.clone();
        let cleaned: Float64Chunked = raw
            .into_iter()
            .map(|cell| cell.and_then(clean_numeric))
            .collect();

        let unparsed = raw.len() - raw.null_count() - (cleaned.len() - cleaned.null_count());
        if unparsed > 0 {
            debug!("{} cell(s) in '{}' are not numeric; kept as missing", unparsed, scenario);
        }

        df.with_column(cleaned.with_name(scenario).into_series())?;
    }

    records_from_frame(&df).map(KpiTable::from_records)
}

fn records_from_frame(df: &DataFrame) -> Result<Vec<KpiRecord>> {
    let groups = df.column(GROUP_COLUMN)?.str()?;
    let names = df.column(KPI_COLUMN)?.str()?;
    let scenarios = SCENARIOS
        .iter()
        .map(|s| df.column(s).and_then(|c| c.f64().cloned()))
        .collect::<PolarsResult<Vec<Float64Chunked>>>()?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let (group, kpi_name) = match (groups.get(row), names.get(row)) {
            (Some(g), Some(k)) => (g.to_string(), k.to_string()),
            (None, Some(k)) => {
                warn!("Dropping KPI '{}' at row {}: no group precedes it", k, row + 2);
                continue;
            }
            (_, None) => {
                warn!("Dropping row {}: no KPI name", row + 2);
                continue;
            }
        };

        let mut values = [None; 5];
        for (slot, column) in values.iter_mut().zip(&scenarios) {
            *slot = column.get(row);
        }

        records.push(KpiRecord {
            group,
            kpi_name,
            values,
        });
    }

    Ok(records)
}

fn ensure_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let present = df.get_column_names();
    for column in required {
        if !present.contains(column) {
            return Err(DashboardError::MissingColumn {
                column: column.to_string(),
                suggestion: closest_column(column, &present),
            });
        }
    }
    Ok(())
}

fn closest_column(wanted: &str, present: &[&str]) -> Option<String> {
    let wanted = wanted.to_lowercase();
    present
        .iter()
        .map(|p| (jaro_winkler(&wanted, &p.trim().to_lowercase()), *p))
        .filter(|(score, _)| *score >= 0.8)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, p)| p.to_string())
}

/// Cast to text and turn blank cells into nulls so they take part in forward-fill
fn blank_to_null(column: &Series) -> Result<Series> {
    let text = column.cast(&DataType::String)?;
    let cleaned: StringChunked = text
        .str()?
        .into_iter()
        .map(|cell| cell.filter(|s| !s.trim().is_empty()))
        .collect();
    Ok(cleaned.with_name(column.name()).into_series())
}

/// Forward-fill a column of optional labels: each gap takes the nearest
/// preceding value. Leading gaps stay empty.
pub fn forward_fill(values: &[Option<&str>]) -> Result<Vec<Option<String>>> {
    let series = Series::new("values", values);
    let filled = series.fill_null(FillNullStrategy::Forward(None))?;
    Ok(filled
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Normalize a raw scenario cell to a number.
///
/// Everything except digits, `-`, `,` and `.` is dropped. The last separator
/// is the decimal separator only when it occurs once; the other kind is then
/// a grouping mark. A separator that repeats is a grouping mark throughout,
/// provided it is the only kind present. Returns `None` for anything that
/// still does not parse.
pub fn clean_numeric(raw: &str) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(raw, "");

    let normalized = match stripped.rfind([',', '.']) {
        None => stripped.to_string(),
        Some(last_at) => {
            let decimal = if stripped[last_at..].starts_with(',') { ',' } else { '.' };
            let grouping = if decimal == ',' { '.' } else { ',' };
            let repeats = stripped.matches(decimal).count() > 1;

            if repeats && stripped.contains(grouping) {
                return None;
            }

            let mut out = String::with_capacity(stripped.len());
            for ch in stripped.chars() {
                match ch {
                    c if c == decimal && !repeats => out.push('.'),
                    ',' | '.' => {}
                    other => out.push(other),
                }
            }
            out
        }
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
