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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Check that a file is a valid CAMI file
    Validate {
        // Input file
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Format variant
        #[arg(short = 't', long = "type", required = true, help = "File type: binning or profile")]
        task: cami_io::Task,

        // Verbosity, also prints the data rows
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Read a CAMI file and write it back out in canonical form
    Rewrite {
        // Input file
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Format variant
        #[arg(short = 't', long = "type", required = true, help = "File type: binning or profile")]
        task: cami_io::Task,

        // Output file path
        #[arg(short = 'o', long = "output", required = true)]
        out_file: PathBuf,

        // Replace the output file if it exists
        #[arg(long = "overwrite", default_value_t = false)]
        overwrite: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
