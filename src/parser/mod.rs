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

//! Reader for CAMI files.
//!
//! [Reader] consumes and validates the header when it is created and then
//! iterates over the data rows, returning one [DataRow] at a time using
//! next().
//!
//! Creating a Reader fails if the header:
//!   - contains a malformed `@key:value` line or repeats a key,
//!   - declares a `task` or `version` the [FormatConfig] does not support,
//!   - is missing a mandatory key,
//!   - has a column definition other than the expected one,
//!   - ends before the column definition line.
//!
//! A data row with the wrong number of fields is returned as a
//! [FieldError]. Iteration can continue past it.
//!
//! ## Usage
//!
//! ```rust
//! use cami_io::parser::Reader;
//! use cami_io::PROFILING;
//!
//! let data = b"@task:profiling\n@version:1.0\n@contestantid:x\n@sampleid:y\n@ranks:genus|species\n@@TAXID\tRANK\tTAXPATH\tTAXPATH_SN\tPERCENTAGE\n561\tgenus\t561\tEscherichia\t100.0\n";
//!
//! let mut reader = Reader::new(&data[..], &PROFILING).unwrap();
//! assert_eq!(reader.header_value("Ranks").unwrap(), "genus|species");
//!
//! let row = reader.next().unwrap().unwrap();
//! assert_eq!(row, vec!["561", "genus", "561", "Escherichia", "100.0"]);
//! assert!(reader.next().is_none());
//! ```
//!

// Format specific implementations
pub mod binning;
pub mod profiling;

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::DataRow;
use crate::FormatConfig;
use crate::error::{Error, FieldError, HeaderError, ParseError};
use crate::format::{classify, parse_column_line, parse_header_line, split_fields, strip_terminator, LineKind};
use crate::headers::{ColumnDefinition, HeaderInfo};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Opens `path` for reading, decompressing gzip input.
///
/// Terminates with [ParseError::Open] if the file can not be opened.
///
pub fn open_input(
    path: &Path,
) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).map_err(|source| ParseError::Open { path: path.to_path_buf(), source })?;
    let mut conn = BufReader::new(file);

    let is_gzip = conn.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        log::debug!("Reading {} as gzip", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(conn))))
    } else {
        Ok(Box::new(conn))
    }
}

pub struct Reader<R: BufRead> {
    conn: R,
    buf: String,
    line_number: usize,

    config: FormatConfig,
    header_info: HeaderInfo,
    columns: ColumnDefinition,
}

impl<R: BufRead> Reader<R> {
    /// Reads and validates the header from `conn`.
    ///
    /// After this returns, `conn` is positioned at the first line after the
    /// column definition.
    pub fn new(
        conn: R,
        config: &FormatConfig,
    ) -> Result<Self, Error> {
        let mut reader = Reader {
            conn, buf: String::new(), line_number: 0,
            config: config.clone(), header_info: HeaderInfo::new(), columns: ColumnDefinition::default(),
        };
        reader.read_header()?;
        log::debug!("Read {} header fields for task {}", reader.header_info.len(), reader.config.task);
        Ok(reader)
    }
}

impl Reader<Box<dyn BufRead>> {
    /// Opens the file at `path` and reads its header.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        config: &FormatConfig,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let conn = open_input(path)?;
        let reader = Reader::new(conn, config)?;
        log::info!("Opened {} as a CAMI {} file", path.display(), config.task);
        Ok(reader)
    }
}

impl<R: BufRead> Reader<R> {
    /// Reads the next line into `buf`. Returns false at end of input.
    fn read_line(&mut self) -> Result<bool, Error> {
        self.buf.clear();
        if self.conn.read_line(&mut self.buf)? == 0 {
            return Ok(false)
        }
        self.line_number += 1;
        Ok(true)
    }

    fn read_header(&mut self) -> Result<(), Error> {
        loop {
            if !self.read_line()? {
                return Err(HeaderError::Incomplete { line: self.line_number }.into())
            }

            match classify(&self.buf) {
                LineKind::Blank | LineKind::Comment => continue,
                LineKind::Header => {
                    let line = self.buf.trim().to_string();
                    self.parse_header(&line)?;
                },
                LineKind::Columns => {
                    let found = ColumnDefinition::new(&parse_column_line(&self.buf));
                    if !found.matches(self.config.columns) {
                        return Err(HeaderError::ColumnMismatch {
                            line: self.line_number,
                            found: found.names().to_vec(),
                            expected: self.config.columns.iter().map(|name| name.to_string()).collect(),
                        }.into())
                    }
                    self.columns = found;
                    break;
                },
                LineKind::Data => {
                    return Err(HeaderError::UnexpectedData {
                        line: self.line_number,
                        content: strip_terminator(&self.buf).to_string(),
                    }.into())
                },
            }
        }

        self.check_mandatory()?;
        Ok(())
    }

    fn parse_header(&mut self, line: &str) -> Result<(), Error> {
        let (key, value) = parse_header_line(line, self.line_number)?;

        if self.header_info.contains_key(&key) {
            return Err(HeaderError::DuplicateKey { line: self.line_number, content: line.to_string() }.into())
        }

        if let Some(supported) = self.config.supported(&key) {
            if !supported.contains(&value.as_str()) {
                return Err(HeaderError::Unsupported {
                    line: self.line_number,
                    key, value,
                    supported: supported.iter().map(|s| s.to_string()).collect(),
                }.into())
            }
        } else if !self.config.mandatory().any(|mandatory| mandatory == key) {
            log::warn!("Unknown header field {} at line {}", key, self.line_number);
        }

        self.header_info.insert(&key, &value);
        Ok(())
    }

    fn check_mandatory(&self) -> Result<(), Error> {
        if let Some(key) = self.config.mandatory().find(|key| !self.header_info.contains_key(key)) {
            return Err(HeaderError::MissingMandatory { key: key.to_string() }.into())
        }
        Ok(())
    }

    fn parse_row(&self) -> Result<DataRow, Error> {
        let fields = split_fields(&self.buf);
        if fields.len() != self.columns.len() {
            return Err(FieldError::Count {
                line: self.line_number,
                expected: self.columns.len(),
                found: fields.len(),
                content: self.buf.trim().to_string(),
            }.into())
        }
        Ok(fields)
    }
}

impl<R: BufRead> Reader<R> {
    pub fn column_definition(&self) -> &ColumnDefinition {
        &self.columns
    }

    pub fn header_info(&self) -> &HeaderInfo {
        &self.header_info
    }

    /// Returns the value of header field `key`.
    ///
    /// The lookup is case-insensitive. Terminates with
    /// [HeaderError::NotFound] if the header does not contain `key`.
    ///
    pub fn header_value(
        &self,
        key: &str,
    ) -> Result<&str, Error> {
        let key = key.to_lowercase();
        self.header_info.get(&key).ok_or_else(|| HeaderError::NotFound { key }.into())
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Closes the underlying input.
    ///
    /// Dropping the Reader has the same effect.
    pub fn close(self) {
        log::debug!("Closing reader after {} lines", self.line_number);
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<DataRow, Error>;

    fn next(
        &mut self,
    ) -> Option<Result<DataRow, Error>> {
        loop {
            match self.read_line() {
                Ok(true) => (),
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }

            match classify(&self.buf) {
                LineKind::Blank | LineKind::Comment => continue,
                _ => return Some(self.parse_row()),
            }
        }
    }
}
