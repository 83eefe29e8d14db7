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

//! cami-io is a library and a command-line client for reading, writing and
//! validating files in the CAMI results format.
//!
//! The following variants of the format are supported:
//!   - Binning (`@task:binning`), columns `SEQUENCEID TAXID BINID`.
//!   - Taxonomic profiling (`@task:profiling`), columns
//!     `TAXID RANK TAXPATH TAXPATH_SN PERCENTAGE`.
//!
//! Both variants use version `1.0` of the format.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The cami CLI supports the following subcommands:
//!   - `cami validate` check that a file is a valid binning or profiling file.
//!   - `cami rewrite` read a file and write it back out in canonical form.
//!
//! ### Rust API
//!
//! For access to a single record at a time, the following structs are
//! provided:
//!
//!   - [Reader](parser::Reader): takes a [BufRead] or a path, validates the
//!     header and iterates over the data rows.
//!   - [WriterBuilder](printer::WriterBuilder): collects the header metadata
//!     for a variant and creates a [Writer](printer::Writer).
//!   - [Writer](printer::Writer): writes data rows after the header.
//!
//! The variants are described by a [FormatConfig], see [BINNING] and
//! [PROFILING].
//!
//! ```rust
//! use cami_io::parser::Reader;
//!
//! let data = b"#CAMI Format for Binning
//! @task:binning
//! @version:1.0
//! @contestantid:x
//! @sampleid:y
//! @referencebased:T
//! @assemblybased:F
//! @replicateinfo:F
//! @@SEQUENCEID\tTAXID\tBINID
//! read001\t123\t321
//! read002\t124\t322
//! ";
//!
//! let reader = Reader::binning(&data[..]).unwrap();
//! let rows: Vec<Vec<String>> = reader.collect::<Result<_, _>>().unwrap();
//!
//! assert_eq!(rows, vec![vec!["read001", "123", "321"], vec!["read002", "124", "322"]]);
//! ```
//!
//! ## File format specification
//!
//! A file starts with a header of `@key:value` lines terminated by the
//! column definition line `@@NAME<tab>NAME...`. The header is followed by
//! the data rows, one tab-separated value per column. Lines starting with
//! `#` and blank lines are ignored everywhere. See [format] for details.
//!

use std::io::BufRead;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;

use error::ParseError;
use headers::HeaderInfo;
use headers::{ASSEMBLY_BASED_KEY, REFERENCE_BASED_KEY, REPLICATE_INFO_KEY, RANKS_KEY};
use headers::{CONTESTANT_ID_KEY, SAMPLE_ID_KEY, TASK_KEY, VERSION_KEY};
use parser::Reader;
use printer::{Variant, Writer, WriterBuilder};

pub mod error;
pub mod format;
pub mod headers;
pub mod parser;
pub mod printer;

pub use error::Error;

/// A single data row, one value per column.
pub type DataRow = Vec<String>;

/// Supported format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Binning,
    Profiling,
}

impl Task {
    pub fn config(&self) -> &'static FormatConfig {
        match self {
            Task::Binning => &BINNING,
            Task::Profiling => &PROFILING,
        }
    }
}

impl std::str::FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binning" => Ok(Task::Binning),
            "profile" | "profiling" => Ok(Task::Profiling),
            _ => Err(format!("'{}' is not a valid Task", s)),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.config().task)
    }
}

/// Fixed description of a format variant.
///
/// Used by [Reader] to negotiate the task and version and to check the
/// header, and by [WriterBuilder] to produce the default header.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Value of the `task` key.
    pub task: &'static str,
    /// Accepted values of the `version` key.
    pub versions: &'static [&'static str],
    /// Version written to new files.
    pub version: &'static str,
    /// Keys required in addition to [GENERIC_KEYS](headers::GENERIC_KEYS).
    pub mandatory_keys: &'static [&'static str],
    /// Expected column definition.
    pub columns: &'static [&'static str],
    /// Header keys and their default values when writing.
    pub defaults: &'static [(&'static str, &'static str)],
    /// Comment line written before the header.
    pub banner: &'static str,
}

impl FormatConfig {
    /// All keys a file must contain, generic keys first.
    pub fn mandatory(&self) -> impl Iterator<Item = &'static str> + '_ {
        headers::GENERIC_KEYS.into_iter().chain(self.mandatory_keys.iter().copied())
    }

    /// Accepted values of `key`, or None if any value is accepted.
    pub fn supported(&self, key: &str) -> Option<Vec<&'static str>> {
        match key {
            TASK_KEY => Some(vec![self.task]),
            VERSION_KEY => Some(self.versions.to_vec()),
            _ => None,
        }
    }

    /// Header written by a new [Writer] before any setters are applied.
    ///
    /// `contestantid` and `sampleid` are present but empty.
    pub fn default_header(&self) -> HeaderInfo {
        let mut info = HeaderInfo::new();
        info.insert(TASK_KEY, self.task);
        info.insert(VERSION_KEY, self.version);
        info.insert(CONTESTANT_ID_KEY, "");
        info.insert(SAMPLE_ID_KEY, "");
        self.defaults.iter().for_each(|(key, value)| {
            info.insert(key, value);
        });
        info
    }
}

pub static BINNING: FormatConfig = FormatConfig {
    task: "binning",
    versions: &["1.0"],
    version: "1.0",
    mandatory_keys: &[REFERENCE_BASED_KEY, ASSEMBLY_BASED_KEY, REPLICATE_INFO_KEY],
    columns: &["SEQUENCEID", "TAXID", "BINID"],
    defaults: &[(REFERENCE_BASED_KEY, "F"), (ASSEMBLY_BASED_KEY, "F"), (REPLICATE_INFO_KEY, "F")],
    banner: "#CAMI Format for Binning",
};

pub static PROFILING: FormatConfig = FormatConfig {
    task: "profiling",
    versions: &["1.0"],
    version: "1.0",
    mandatory_keys: &[RANKS_KEY],
    columns: &["TAXID", "RANK", "TAXPATH", "TAXPATH_SN", "PERCENTAGE"],
    defaults: &[(RANKS_KEY, "superkingdom|phylum|class|order|family|genus|species|strain")],
    banner: "#CAMI Format for Profiling",
};

/// Copies the header of `reader` into a new [WriterBuilder].
///
/// `task` and `version` come from the variant. Keys the variant does not
/// define are dropped with a warning.
fn builder_from_header<V: Variant>(
    header: &HeaderInfo,
) -> Result<WriterBuilder<V>, Error> {
    let mut builder = WriterBuilder::<V>::new();
    for (key, value) in header.iter() {
        if key == TASK_KEY || key == VERSION_KEY {
            continue;
        }
        if !builder.header_info().contains_key(key) {
            log::warn!("Dropping unknown header field {}", key);
            continue;
        }
        builder.set_header(key, value)?;
    }
    Ok(builder)
}

fn copy_rows<R: BufRead, W: Write>(
    reader: &mut Reader<R>,
    writer: &mut Writer<W>,
) -> Result<usize, Error> {
    let mut n_rows = 0;
    for row in reader.by_ref() {
        writer.write_row(&row?)?;
        n_rows += 1;
    }
    Ok(n_rows)
}

/// Read a CAMI file from [BufRead] and write it to [Write].
///
/// The header values and data rows are read with a [Reader] for the variant
/// `V` and written out with a [Writer] for the same variant. Comments and
/// blank lines are not kept.
///
/// Returns the number of data rows.
///
/// ## Usage
///
/// ```rust
/// use cami_io::rewrite;
/// use cami_io::printer::binning::Binning;
///
/// let data = b"@task:binning\n@version:1.0\n@contestantid:x\n@sampleid:y\n@referencebased:T\n@assemblybased:F\n@replicateinfo:F\n\n@@SEQUENCEID\tTAXID\tBINID\n# first read\nread001\t123\t321\n";
///
/// let mut output: Vec<u8> = Vec::new();
/// let n_rows = rewrite::<Binning, _, _>(&data[..], &mut output).unwrap();
///
/// let expected = b"#CAMI Format for Binning\n@task:binning\n@version:1.0\n@contestantid:x\n@sampleid:y\n@referencebased:t\n@assemblybased:f\n@replicateinfo:f\n@@SEQUENCEID\tTAXID\tBINID\nread001\t123\t321\n";
///
/// assert_eq!(n_rows, 1);
/// assert_eq!(output, expected.to_vec());
/// ```
///
pub fn rewrite<V: Variant, R: BufRead, W: Write>(
    conn_in: R,
    conn_out: W,
) -> Result<usize, Error> {
    let mut reader = Reader::new(conn_in, V::config())?;
    let builder = builder_from_header::<V>(reader.header_info())?;
    let mut writer = builder.build(conn_out)?;
    let n_rows = copy_rows(&mut reader, &mut writer)?;
    writer.close()?;
    Ok(n_rows)
}

/// Read the CAMI file at `input` and write it to `output`.
///
/// Same as [rewrite] but refuses to write over `output` unless `overwrite`
/// is set, and never writes over `input`.
///
/// The rows are written to a temporary file next to `output`, which is
/// renamed to `output` only after every row was copied. If reading fails
/// partway, `output` is left as it was.
///
pub fn rewrite_file<V: Variant, P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    overwrite: bool,
) -> Result<usize, Error> {
    let (input, output) = (input.as_ref(), output.as_ref());
    if input.exists() && output.exists() && std::fs::canonicalize(input)? == std::fs::canonicalize(output)? {
        return Err(ParseError::Exists { path: output.to_path_buf() }.into())
    }
    if !overwrite && output.exists() {
        return Err(ParseError::Exists { path: output.to_path_buf() }.into())
    }

    let mut reader = Reader::from_path(input, V::config())?;
    let builder = builder_from_header::<V>(reader.header_info())?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|source| ParseError::Open { path: dir.to_path_buf(), source })?;

    let mut writer = builder.build(BufWriter::new(tmp))?;
    let n_rows = copy_rows(&mut reader, &mut writer)?;
    let tmp = writer.close()?.into_inner().map_err(|e| e.into_error())?;

    let persisted = if overwrite { tmp.persist(output) } else { tmp.persist_noclobber(output) };
    persisted.map_err(|e| match e.error.kind() {
        ErrorKind::AlreadyExists => ParseError::Exists { path: output.to_path_buf() },
        _ => ParseError::Open { path: output.to_path_buf(), source: e.error },
    })?;

    log::info!("Wrote {} data rows to {}", n_rows, output.display());
    Ok(n_rows)
}
