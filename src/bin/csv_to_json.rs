// src/bin/csv_to_json.rs

use clap::{error::ErrorKind, Parser};
use csvtidy::{
    convert::{self, ConvertOptions, DocumentFormat},
    logging, InputEncoding,
};
use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "csv_to_json")]
#[command(about = "Convert a CSV file to JSON.")]
struct Args {
    /// Path to the input CSV file.
    csv_file: PathBuf,

    /// Path to the output JSON file.
    json_file: PathBuf,

    /// Output document format: json or yaml
    #[arg(long, default_value = "json")]
    format: DocumentFormat,

    /// Input encoding: "auto" or a label such as latin1
    #[arg(long, default_value = "auto")]
    encoding: InputEncoding,

    /// Key that collects fields beyond the last header
    #[arg(long, default_value = "_extra")]
    rest_key: String,
}

fn main() {
    let code = match parse_args(std::env::args_os()) {
        Ok(args) => {
            logging::init();
            run(&args, &mut io::stdout())
        }
        Err(code) => code,
    };
    std::process::exit(code);
}

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

/// Convert and report on `out`; returns the process exit code.
fn run<O: Write>(args: &Args, out: &mut O) -> i32 {
    let opts = ConvertOptions {
        format: args.format,
        encoding: args.encoding.clone(),
        rest_key: args.rest_key.clone(),
    };

    match convert::convert_file(&args.csv_file, &args.json_file, &opts) {
        Ok(_) => {
            let _ = writeln!(
                out,
                "Successfully converted '{}' to '{}'.",
                args.csv_file.display(),
                args.json_file.display()
            );
            0
        }
        Err(err) => {
            debug!(error = ?err, "convert failed");
            let _ = writeln!(out, "An error occurred: {:#}", err);
            1
        }
    }
}
