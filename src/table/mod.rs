// src/table/mod.rs
pub mod encoding;

pub use encoding::InputEncoding;

use crate::error::{TidyError, TidyResult};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs,
    io::{ErrorKind, Read, Write},
    path::Path,
};
use tracing::{debug, instrument};

/// A fully materialized CSV file: the header row plus every data row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// Column names, exactly as they appear in the header row.
    pub headers: Vec<String>,
    /// One entry per data row. `None` marks a field the row did not have
    /// (the row was shorter than the header); `Some("")` is an empty field.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the cells of column `idx`, yielding `None` for rows that are
    /// too short to have it.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(|c| c.as_deref()))
    }

    /// Parse CSV text that starts with a header row.
    pub fn from_reader<R: Read>(rdr: R) -> TidyResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let mut row: Vec<Option<String>> =
                record.iter().map(|s| Some(s.to_string())).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), None);
            }
            rows.push(row);
        }
        Ok(Table { headers, rows })
    }

    /// Decode `bytes` under `policy`, then parse them.
    pub fn from_bytes(bytes: &[u8], policy: &InputEncoding) -> TidyResult<Self> {
        let text = encoding::decode(bytes, policy)?;
        Self::from_reader(text.as_bytes())
    }

    /// Read and parse the file at `path`. A missing file is reported as
    /// [`TidyError::FileNotFound`] so callers can tell it apart.
    #[instrument(level = "info", skip(path, policy), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P, policy: &InputEncoding) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TidyError::FileNotFound(path.to_path_buf()).into())
            }
            Err(e) => {
                return Err(TidyError::Io(e))
                    .with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        let table = Self::from_bytes(&bytes, policy)
            .with_context(|| format!("CSV parse error in {}", path.display()))?;
        debug!(
            columns = table.headers.len(),
            rows = table.rows.len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Write headers and rows as CSV. Missing cells become empty fields.
    pub fn write_csv<W: Write>(&self, wtr: W) -> TidyResult<()> {
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(wtr);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> TidyResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}
