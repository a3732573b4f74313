use std::path::PathBuf;
use thiserror::Error;

/// Failures the pipelines report by kind; everything else travels as
/// `anyhow` context on top of these.
#[derive(Error, Debug)]
pub enum TidyError {
    #[error("The file {} was not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Could not find a column for {role} (header containing {marker:?})")]
    UnresolvedColumn { role: String, marker: &'static str },

    #[error("Columns {first:?} and {second:?} both match {role}")]
    AmbiguousColumn {
        role: String,
        first: String,
        second: String,
    },

    #[error("Unknown input encoding: {0}")]
    UnknownEncoding(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type TidyResult<T> = Result<T, TidyError>;
