// cami-io: Reader and writer for the CAMI binning and profiling formats.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use cami_io::Task;
use cami_io::parser::Reader;
use cami_io::printer::binning::Binning;
use cami_io::printer::profiling::Profiling;

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    let res = stderrlog::new()
    .module(module_path!())
    .module("cami_io")
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init();
    if let Err(e) = res {
        eprintln!("Could not initialize logging: {}", e);
    }
}

/// Reads every row of `path` and reports what was found.
///
/// Status lines are written to `out`, the header, columns and rows to `err`.
fn validate<O: Write, E: Write>(
    path: &Path,
    task: Task,
    print_rows: bool,
    out: &mut O,
    err: &mut E,
) -> Result<usize, cami_io::Error> {
    let reader = Reader::from_path(path, task.config())?;

    writeln!(out, "Header information:")?;
    write!(err, "{}", reader.header_info())?;
    writeln!(out)?;
    writeln!(out, "Data fields:")?;
    writeln!(err, "{}", reader.column_definition())?;

    let mut n_rows = 0;
    for row in reader {
        let row = row?;
        if print_rows {
            writeln!(err, "{}", row.join("\t"))?;
        }
        n_rows += 1;
    }
    writeln!(out)?;
    Ok(n_rows)
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Subcommands:
    match &cli.command {
        // Validate
        Some(cli::Commands::Validate {
            input_file,
            task,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            println!("Validating input file as a CAMI {} file", task);
            match validate(input_file, *task, *verbose, &mut std::io::stdout(), &mut std::io::stderr()) {
                Ok(n_rows) => {
                    println!("Read {} data rows, check that this is correct.", n_rows);
                    println!("VALIDATION OK.");
                    ExitCode::SUCCESS
                },
                Err(e) => {
                    println!("VALIDATION FAILED.");
                    println!("Exception: {}", e);
                    ExitCode::FAILURE
                },
            }
        },

        // Rewrite
        Some(cli::Commands::Rewrite {
            input_file,
            task,
            out_file,
            overwrite,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let res = match task {
                Task::Binning => cami_io::rewrite_file::<Binning, _, _>(input_file, out_file, *overwrite),
                Task::Profiling => cami_io::rewrite_file::<Profiling, _, _>(input_file, out_file, *overwrite),
            };
            match res {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    log::error!("{}", e);
                    ExitCode::FAILURE
                },
            }
        },

        None => {
            let _ = cli::Cli::command().print_help();
            ExitCode::FAILURE
        },
    }
}

// Tests
#[cfg(test)]
mod tests {

    const BINNING: &[u8] = b"#CAMI Format for Binning\n@task:binning\n@version:1.0\n@contestantid:x\n@sampleid:y\n@referencebased:T\n@assemblybased:F\n@replicateinfo:F\n@@SEQUENCEID\tTAXID\tBINID\nread001\t123\t321\nread002\t124\t322\n";

    #[test]
    fn validate_splits_status_and_contents() {
        use super::validate;
        use cami_io::Task;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binning.txt");
        std::fs::write(&path, BINNING).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let got = validate(&path, Task::Binning, true, &mut out, &mut err).unwrap();

        let expected_err = "task=binning\nversion=1.0\ncontestantid=x\nsampleid=y\nreferencebased=t\nassemblybased=f\nreplicateinfo=f\n[SEQUENCEID, TAXID, BINID]\nread001\t123\t321\nread002\t124\t322\n";

        assert_eq!(got, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "Header information:\n\nData fields:\n\n");
        assert_eq!(String::from_utf8(err).unwrap(), expected_err);
    }

    #[test]
    fn validate_rejects_wrong_task() {
        use super::validate;
        use cami_io::Task;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binning.txt");
        std::fs::write(&path, BINNING).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let got = validate(&path, Task::Profiling, false, &mut out, &mut err);

        assert!(got.unwrap_err().is_header());
        assert!(out.is_empty());
    }
}
