// src/process/mod.rs
pub mod normalize;
pub mod resolve;
pub mod split;

pub use normalize::{normalize_table, normalize_text};
pub use resolve::{resolve_columns, Role, RoleColumns, TieBreak};
pub use split::{extract_column, split_roles};

use crate::sink::{DirSink, OutputSink};
use crate::table::{InputEncoding, Table};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, instrument};

/// Names and policies for one clean-and-split run.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Name of the whole-table normalized copy.
    pub cleaned_name: String,
    pub helpful_name: String,
    pub unhelpful_name: String,
    pub suggestions_name: String,
    pub tie_break: TieBreak,
    pub encoding: InputEncoding,
    /// Skip writing the normalized copy when false.
    pub write_cleaned: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            cleaned_name: "cleaned_file.csv".into(),
            helpful_name: "helpful_responses.csv".into(),
            unhelpful_name: "unhelpful_responses.csv".into(),
            suggestions_name: "suggestions_responses.csv".into(),
            tie_break: TieBreak::default(),
            encoding: InputEncoding::default(),
            write_cleaned: true,
        }
    }
}

impl SplitConfig {
    pub fn output_name(&self, role: Role) -> &str {
        match role {
            Role::Helpful => &self.helpful_name,
            Role::Unhelpful => &self.unhelpful_name,
            Role::Suggestions => &self.suggestions_name,
        }
    }
}

/// What a split run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub input_rows: usize,
    /// (role, file name, rows written) in role order.
    pub outputs: Vec<(Role, String, usize)>,
}

impl SplitReport {
    pub fn rows_for(&self, role: Role) -> Option<usize> {
        self.outputs
            .iter()
            .find(|(r, _, _)| *r == role)
            .map(|(_, _, n)| *n)
    }
}

/// Normalize `table`, write the cleaned copy, resolve the three role
/// columns and write one file per role into `sink`.
///
/// Column resolution happens after the cleaned copy is written, so a
/// table missing a role still leaves the cleaned file behind.
pub fn run_split(table: &Table, cfg: &SplitConfig, sink: &mut dyn OutputSink) -> Result<SplitReport> {
    let cleaned = normalize_table(table);
    if cfg.write_cleaned {
        sink.write_table(&cfg.cleaned_name, &cleaned)
            .with_context(|| format!("Failed to save {}", cfg.cleaned_name))?;
        info!(name = %cfg.cleaned_name, rows = cleaned.len(), "saved cleaned table");
    }

    let columns = resolve_columns(&cleaned.headers, cfg.tie_break)?;
    for (role, col) in columns.iter() {
        info!(%role, column = %col.name, index = col.index, "resolved");
    }

    let mut outputs = Vec::with_capacity(Role::ALL.len());
    for (role, part) in split_roles(&cleaned, &columns) {
        let name = cfg.output_name(role);
        sink.write_table(name, &part)
            .with_context(|| format!("Failed to save {name}"))?;
        outputs.push((role, name.to_string(), part.len()));
    }

    Ok(SplitReport {
        input_rows: table.len(),
        outputs,
    })
}

/// Load `path` and run [`run_split`] into files under `out_dir`.
#[instrument(level = "info", skip(path, out_dir, cfg), fields(path = %path.as_ref().display()))]
pub fn split_file<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    out_dir: Q,
    cfg: &SplitConfig,
) -> Result<SplitReport> {
    let table = Table::load(&path, &cfg.encoding)?;
    info!(rows = table.len(), columns = table.headers.len(), "loaded");
    let mut sink = DirSink::new(out_dir);
    run_split(&table, cfg, &mut sink)
}
