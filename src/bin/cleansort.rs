// src/bin/cleansort.rs

use clap::{error::ErrorKind, Parser};
use csvtidy::{
    logging,
    process::{self, SplitConfig, TieBreak},
    sink::DirSink,
    InputEncoding, Table, TidyError,
};
use std::{
    ffi::OsString,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "cleansort")]
#[command(about = "Clean and split survey data.")]
struct Args {
    /// Path to the survey CSV file
    file: PathBuf,

    /// Directory the cleaned and split files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Input encoding: "auto" (UTF-8, falling back to Windows-1252) or a label such as latin1
    #[arg(long, default_value = "auto")]
    encoding: InputEncoding,

    /// Which header wins when several match the same question: last, first or strict
    #[arg(long, default_value = "last")]
    tie_break: TieBreak,

    /// Do not write cleaned_file.csv
    #[arg(long)]
    no_cleaned: bool,
}

fn main() {
    let code = match parse_args(std::env::args_os()) {
        Ok(args) => {
            logging::init();
            run(&args, &mut io::stdout(), &mut io::stderr())
        }
        Err(code) => code,
    };
    std::process::exit(code);
}

/// Parse the command line. On failure clap's message (with usage) is
/// printed and the exit code returned: 0 for --help/--version, 1 otherwise.
fn parse_args<I, T>(argv: I) -> Result<Args, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv).map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => 1,
        }
    })
}

/// Load, clean and split; returns the process exit code.
fn run<O: Write, E: Write>(args: &Args, out: &mut O, err: &mut E) -> i32 {
    let cfg = SplitConfig {
        tie_break: args.tie_break,
        encoding: args.encoding.clone(),
        write_cleaned: !args.no_cleaned,
        ..SplitConfig::default()
    };

    let table = match Table::load(&args.file, &cfg.encoding) {
        Ok(table) => table,
        Err(e) => return report_failure(&args.file, &e, err),
    };
    let _ = writeln!(
        out,
        "Loaded {} with {} rows.",
        args.file.display(),
        table.len()
    );

    let mut sink = DirSink::new(&args.out_dir);
    match process::run_split(&table, &cfg, &mut sink) {
        Ok(report) => {
            let names: Vec<String> = report
                .outputs
                .iter()
                .map(|(_, name, rows)| format!("'{}' ({} rows)", name, rows))
                .collect();
            let _ = writeln!(out, "Files saved as {}", names.join(", "));
            info!("all done");
            0
        }
        Err(e) => report_failure(&args.file, &e, err),
    }
}

fn report_failure<E: Write>(file: &Path, e: &anyhow::Error, err: &mut E) -> i32 {
    debug!(file = %file.display(), error = ?e, "split failed");
    let _ = match e.downcast_ref::<TidyError>() {
        Some(TidyError::FileNotFound(path)) => {
            writeln!(err, "Error: The file {} was not found.", path.display())
        }
        _ => writeln!(err, "Error processing {}: {:#}", file.display(), e),
    };
    1
}
