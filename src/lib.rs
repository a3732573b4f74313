//! Small CSV tools for survey exports: a text normalizer that splits the
//! answer columns into their own files, and a CSV to JSON/YAML converter.

pub mod convert;
pub mod error;
pub mod logging;
pub mod process;
pub mod sink;
pub mod table;

pub use error::{TidyError, TidyResult};
pub use table::{InputEncoding, Table};
