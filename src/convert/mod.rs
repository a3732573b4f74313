// src/convert/mod.rs
use crate::error::TidyResult;
use crate::table::{InputEncoding, Table};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};
use std::{fs, io::Write, path::Path, str::FromStr};
use tracing::{info, instrument, warn};

/// One row as column name → value, in header order.
pub type Record = Map<String, Value>;

/// Serialization used for the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// JSON array indented with four spaces.
    #[default]
    Json,
    Yaml,
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            other => Err(format!("unknown document format {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub format: DocumentFormat,
    pub encoding: InputEncoding,
    /// Key holding fields past the last header, as an array of strings.
    pub rest_key: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: DocumentFormat::Json,
            encoding: InputEncoding::Auto,
            rest_key: "_extra".into(),
        }
    }
}

/// Turn every row into a [`Record`]. Values stay strings; a cell the row
/// lacks becomes `null`. If a header repeats, its first position is kept
/// and the later value wins.
pub fn to_records(table: &Table, opts: &ConvertOptions) -> Vec<Record> {
    let width = table.headers.len();
    table
        .rows
        .iter()
        .map(|row| {
            let mut rec = Record::new();
            for (name, cell) in table.headers.iter().zip(row.iter()) {
                let value = cell.clone().map_or(Value::Null, Value::String);
                rec.insert(name.clone(), value);
            }
            if row.len() > width {
                let rest: Vec<Value> = row[width..]
                    .iter()
                    .map(|c| c.clone().map_or(Value::Null, Value::String))
                    .collect();
                rec.insert(opts.rest_key.clone(), Value::Array(rest));
            }
            rec
        })
        .collect()
}

/// Serialize `records` into `out`, followed by a trailing newline.
pub fn write_document<W: Write>(
    records: &[Record],
    format: DocumentFormat,
    mut out: W,
) -> TidyResult<()> {
    match format {
        DocumentFormat::Json => {
            let fmt = PrettyFormatter::with_indent(b"    ");
            let mut ser = Serializer::with_formatter(&mut out, fmt);
            records.serialize(&mut ser)?;
            out.write_all(b"\n")?;
        }
        DocumentFormat::Yaml => {
            serde_yaml::to_writer(&mut out, records)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Read `input`, convert it, and write the document to `output` in one go.
/// Returns the number of records written.
#[instrument(level = "info", skip(input, output, opts), fields(input = %input.as_ref().display()))]
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    opts: &ConvertOptions,
) -> Result<usize> {
    let output = output.as_ref();
    let table = Table::load(&input, &opts.encoding)?;
    let records = to_records(&table, opts);
    if table.rows.iter().any(|r| r.len() > table.headers.len()) {
        warn!(key = %opts.rest_key, "rows longer than the header; extra fields kept under rest key");
    }

    let mut buf = Vec::new();
    write_document(&records, opts.format, &mut buf)
        .with_context(|| format!("Failed to serialize {:?} document", opts.format))?;
    fs::write(output, &buf).with_context(|| format!("Failed to write {}", output.display()))?;

    info!(records = records.len(), output = %output.display(), "converted");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn rows_become_ordered_records() {
        let recs = to_records(&table("a,b\n1,2\n3,4\n"), &ConvertOptions::default());
        assert_eq!(
            Value::Array(recs.into_iter().map(Value::Object).collect()),
            json!([{"a": "1", "b": "2"}, {"a": "3", "b": "4"}])
        );
    }

    #[test]
    fn keeps_header_order_and_text_values() {
        let recs = to_records(
            &table("zeta,alpha,mid\n007,true,1.50\n"),
            &ConvertOptions::default(),
        );
        let keys: Vec<&String> = recs[0].keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(recs[0]["zeta"], json!("007"));
        assert_eq!(recs[0]["alpha"], json!("true"));
    }

    #[test]
    fn short_and_long_rows() {
        let opts = ConvertOptions {
            rest_key: "rest".into(),
            ..ConvertOptions::default()
        };
        let recs = to_records(&table("a,b\n1\n1,2,3,4\n"), &opts);
        assert_eq!(Value::Object(recs[0].clone()), json!({"a": "1", "b": null}));
        assert_eq!(
            Value::Object(recs[1].clone()),
            json!({"a": "1", "b": "2", "rest": ["3", "4"]})
        );
    }

    #[test]
    fn duplicate_header_keeps_first_slot_last_value() {
        let recs = to_records(&table("a,b,a\n1,2,3\n"), &ConvertOptions::default());
        let keys: Vec<&String> = recs[0].keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(recs[0]["a"], json!("3"));
    }

    #[test]
    fn json_uses_four_space_indent() -> Result<()> {
        let recs = to_records(&table("a\n1\n"), &ConvertOptions::default());
        let mut buf = Vec::new();
        write_document(&recs, DocumentFormat::Json, &mut buf)?;
        assert_eq!(
            String::from_utf8(buf)?,
            "[\n    {\n        \"a\": \"1\"\n    }\n]\n"
        );
        Ok(())
    }

    #[test]
    fn yaml_output() -> Result<()> {
        let recs = to_records(&table("a,b\n1,2\n"), &ConvertOptions::default());
        let mut buf = Vec::new();
        write_document(&recs, DocumentFormat::Yaml, &mut buf)?;
        assert_eq!(String::from_utf8(buf)?, "- a: '1'\n  b: '2'\n");
        Ok(())
    }

    #[test]
    fn empty_table_gives_empty_list() -> Result<()> {
        let recs = to_records(&table("a,b\n"), &ConvertOptions::default());
        let mut buf = Vec::new();
        write_document(&recs, DocumentFormat::Json, &mut buf)?;
        assert_eq!(String::from_utf8(buf)?, "[]\n");
        Ok(())
    }

    #[test]
    fn convert_file_round_trip_through_disk() -> Result<()> {
        let tmp = tempdir()?;
        let input = tmp.path().join("in.csv");
        let output = tmp.path().join("out.json");
        fs::write(&input, "a,b\n1,2\n3,4\n")?;

        let n = convert_file(&input, &output, &ConvertOptions::default())?;
        assert_eq!(n, 2);

        let doc: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
        assert_eq!(doc, json!([{"a": "1", "b": "2"}, {"a": "3", "b": "4"}]));
        Ok(())
    }

    #[test]
    fn convert_file_missing_input_writes_nothing() {
        let tmp = tempdir().unwrap();
        let output = tmp.path().join("out.json");
        let err = convert_file(tmp.path().join("nope.csv"), &output, &ConvertOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("was not found"));
        assert!(!output.exists());
    }
}
