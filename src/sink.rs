use crate::table::Table;
use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Where the pipelines put their named outputs. Every call is one
/// whole-file write; an error on one name leaves earlier names untouched.
pub trait OutputSink {
    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()>;

    fn write_table(&mut self, name: &str, table: &Table) -> Result<()> {
        let bytes = table
            .to_csv_bytes()
            .with_context(|| format!("Failed to render {name} as CSV"))?;
        self.write_bytes(name, &bytes)
    }
}

/// Writes each output as a file under `dir`.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl OutputSink for DirSink {
    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(name);
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote output");
        Ok(())
    }
}

/// Keeps outputs in memory, keyed by name.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }
}

impl OutputSink for MemorySink {
    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}
