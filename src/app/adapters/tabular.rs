//! Tabular row adapters
//!
//! Lead sheets arrive as CSV or Parquet files. Each format gets a
//! [`RowSource`] and a [`RowSink`]; [`open_source`] and [`open_sink`] pick
//! the adapter from the file extension. The in-memory pair is used when the
//! pipeline is embedded or under test.
//!
//! Cleaned sets are always written with every cell rendered as text, so a
//! numeric Email read from Parquet comes back out as a string.

use crate::app::models::{CellValue, LeadRecord, RawBatch};
use crate::app::ports::{RowSink, RowSource};
use crate::{Error, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tabular file formats with an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Parquet,
}

impl TabularFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet") => Ok(Self::Parquet),
            _ => Err(Error::unsupported_format(path.display().to_string())),
        }
    }
}

/// Open a row source for `path` based on its extension
pub fn open_source(path: &Path) -> Result<Box<dyn RowSource>> {
    Ok(match TabularFormat::from_path(path)? {
        TabularFormat::Csv => Box::new(CsvRowSource::new(path)),
        TabularFormat::Parquet => Box::new(ParquetRowSource::new(path)),
    })
}

/// Open a row sink for `path` based on its extension
pub fn open_sink(path: &Path) -> Result<Box<dyn RowSink>> {
    Ok(match TabularFormat::from_path(path)? {
        TabularFormat::Csv => Box::new(CsvRowSink::new(path)),
        TabularFormat::Parquet => Box::new(ParquetRowSink::new(path)),
    })
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io(
                format!("Failed to create output directory {}", parent.display()),
                e,
            )
        })?;
    }
    Ok(())
}

/// Text rendering of a row's cells in column order; absent and null cells become empty
fn row_as_text(columns: &[String], row: &LeadRecord) -> Vec<Option<String>> {
    columns
        .iter()
        .map(|column| row.get(column).and_then(CellValue::to_text))
        .collect()
}

// =============================================================================
// CSV
// =============================================================================

/// Reads a headed CSV file; empty fields become null cells
#[derive(Debug)]
pub struct CsvRowSource {
    path: PathBuf,
}

impl CsvRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for CsvRowSource {
    fn read_batch(&mut self) -> Result<RawBatch> {
        ensure_exists(&self.path)?;
        let file = self.path.display().to_string();

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| Error::csv_parsing(&file, "Failed to open CSV file", Some(e)))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| Error::csv_parsing(&file, "Failed to read header row", Some(e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::csv_parsing(&file, format!("Failed to read row {}", line + 1), Some(e))
            })?;

            let row = LeadRecord::from_pairs(columns.iter().enumerate().map(|(i, column)| {
                let value = match record.get(i) {
                    Some(field) if !field.is_empty() => CellValue::from(field),
                    _ => CellValue::Null,
                };
                (column.clone(), value)
            }));
            rows.push(row);
        }

        debug!("Read {} rows with {} columns from {}", rows.len(), columns.len(), file);
        Ok(RawBatch::new(columns, rows))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes rows as a headed CSV file
#[derive(Debug)]
pub struct CsvRowSink {
    path: PathBuf,
}

impl CsvRowSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSink for CsvRowSink {
    fn write_rows(&mut self, columns: &[String], rows: &[LeadRecord]) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let file = self.path.display().to_string();

        let mut writer = csv::Writer::from_path(&self.path)
            .map_err(|e| Error::csv_parsing(&file, "Failed to create CSV file", Some(e)))?;

        writer
            .write_record(columns)
            .map_err(|e| Error::csv_parsing(&file, "Failed to write header row", Some(e)))?;

        for row in rows {
            let cells: Vec<String> = row_as_text(columns, row)
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect();
            writer
                .write_record(&cells)
                .map_err(|e| Error::csv_parsing(&file, "Failed to write row", Some(e)))?;
        }

        writer
            .flush()
            .map_err(|e| Error::io(format!("Failed to flush {}", file), e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// =============================================================================
// Parquet
// =============================================================================

/// Reads a Parquet file into rows, keeping scalar types where they map cleanly
#[derive(Debug)]
pub struct ParquetRowSource {
    path: PathBuf,
}

impl ParquetRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn cell_from_any_value(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(b) => CellValue::Bool(b),
        AnyValue::String(s) => CellValue::from(s),
        AnyValue::StringOwned(s) => CellValue::from(s.as_str()),
        AnyValue::Int8(v) => CellValue::Integer(v.into()),
        AnyValue::Int16(v) => CellValue::Integer(v.into()),
        AnyValue::Int32(v) => CellValue::Integer(v.into()),
        AnyValue::Int64(v) => CellValue::Integer(v),
        AnyValue::UInt8(v) => CellValue::Integer(v.into()),
        AnyValue::UInt16(v) => CellValue::Integer(v.into()),
        AnyValue::UInt32(v) => CellValue::Integer(v.into()),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => CellValue::Integer(v),
            Err(_) => CellValue::Text(v.to_string()),
        },
        AnyValue::Float32(v) => CellValue::Float(v.into()),
        AnyValue::Float64(v) => CellValue::Float(v),
        other => CellValue::Text(other.to_string()),
    }
}

impl RowSource for ParquetRowSource {
    fn read_batch(&mut self) -> Result<RawBatch> {
        ensure_exists(&self.path)?;
        let file = File::open(&self.path)
            .map_err(|e| Error::io(format!("Failed to open {}", self.path.display()), e))?;

        let df = ParquetReader::new(file).finish().map_err(|e| {
            Error::parquet(format!("Failed to read {}", self.path.display()), e)
        })?;

        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let mut row = LeadRecord::new();
            for column in df.get_columns() {
                let value = column.get(i).map_err(|e| {
                    Error::parquet(format!("Failed to read row {} of {}", i + 1, self.path.display()), e)
                })?;
                row.insert(column.name().as_str(), cell_from_any_value(value));
            }
            rows.push(row);
        }

        debug!(
            "Read {} rows with {} columns from {}",
            rows.len(),
            columns.len(),
            self.path.display()
        );
        Ok(RawBatch::new(columns, rows))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes rows as a Snappy-compressed Parquet file of UTF-8 columns
#[derive(Debug)]
pub struct ParquetRowSink {
    path: PathBuf,
}

impl ParquetRowSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSink for ParquetRowSink {
    fn write_rows(&mut self, columns: &[String], rows: &[LeadRecord]) -> Result<()> {
        ensure_parent_dir(&self.path)?;

        let table: Vec<Vec<Option<String>>> =
            rows.iter().map(|row| row_as_text(columns, row)).collect();

        let series: Vec<Column> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<Option<String>> =
                    table.iter().map(|cells| cells[i].clone()).collect();
                Column::new(name.as_str().into(), values)
            })
            .collect();

        let mut df = DataFrame::new(series).map_err(|e| {
            Error::parquet(format!("Failed to build frame for {}", self.path.display()), e)
        })?;

        let file = File::create(&self.path)
            .map_err(|e| Error::io(format!("Failed to create {}", self.path.display()), e))?;

        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map_err(|e| Error::parquet(format!("Failed to write {}", self.path.display()), e))?;

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Hands out a fixed batch
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSource {
    batch: RawBatch,
    reads: usize,
}

impl MemoryRowSource {
    pub fn new(batch: RawBatch) -> Self {
        Self { batch, reads: 0 }
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl RowSource for MemoryRowSource {
    fn read_batch(&mut self) -> Result<RawBatch> {
        self.reads += 1;
        Ok(self.batch.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Captures written rows
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSink {
    pub columns: Vec<String>,
    pub rows: Vec<LeadRecord>,
    writes: usize,
}

impl MemoryRowSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RowSink for MemoryRowSink {
    fn write_rows(&mut self, columns: &[String], rows: &[LeadRecord]) -> Result<()> {
        self.writes += 1;
        self.columns = columns.to_vec();
        self.rows = rows.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
