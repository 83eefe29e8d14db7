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

//! Writer for CAMI files.
//!
//! A [WriterBuilder] holds the header of a new file. It starts from the
//! default header of its [Variant] and can be modified with the setters
//! until the header is committed by [create](WriterBuilder::create) or
//! [build](WriterBuilder::build). These return a [Writer] that accepts
//! the data rows one at a time.
//!
//! Only keys the variant declares can be set. Variant specific setters are
//! implemented in [binning] and [profiling].
//!
//! ## Usage
//!
//! ### Write a binning file to memory
//!
//! ```rust
//! use cami_io::printer::binning::BinningWriterBuilder;
//!
//! let mut builder = BinningWriterBuilder::new();
//! builder.set_contestant_id("team1").unwrap();
//! builder.set_sample_id("sample1").unwrap();
//! builder.set_reference_based().unwrap();
//!
//! let mut output: Vec<u8> = Vec::new();
//! let mut writer = builder.build(&mut output).unwrap();
//! writer.write_row(&["read001", "123", "321"]).unwrap();
//! writer.write_row(&["read002", "124", "322"]).unwrap();
//! writer.close().unwrap();
//!
//! // Expect this plain text output
//! let mut expected: Vec<u8> = Vec::new();
//! expected.append(&mut b"#CAMI Format for Binning\n".to_vec());
//! expected.append(&mut b"@task:binning\n@version:1.0\n".to_vec());
//! expected.append(&mut b"@contestantid:team1\n@sampleid:sample1\n".to_vec());
//! expected.append(&mut b"@referencebased:T\n@assemblybased:F\n@replicateinfo:F\n".to_vec());
//! expected.append(&mut b"@@SEQUENCEID\tTAXID\tBINID\n".to_vec());
//! expected.append(&mut b"read001\t123\t321\nread002\t124\t322\n".to_vec());
//!
//! assert_eq!(output, expected);
//! ```
//!
//! ### Write a profiling file to disk
//!
//! ```rust
//! use cami_io::printer::profiling::ProfilingWriterBuilder;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("profile.txt");
//!
//! let mut builder = ProfilingWriterBuilder::new();
//! builder.set_contestant_id("team1").unwrap()
//!        .set_sample_id("sample1").unwrap()
//!        .set_ranks(&["genus", "species"]).unwrap();
//!
//! let mut writer = builder.create(&path).unwrap();
//! writer.write_row(&["561", "genus", "561", "Escherichia", "100.0"]).unwrap();
//! writer.close().unwrap();
//!
//! // Creating the same file again fails unless overwriting is requested
//! assert!(builder.create(&path).is_err());
//! builder.overwrite(true);
//! assert!(builder.create(&path).is_ok());
//! ```
//!

// Format specific implementations
pub mod binning;
pub mod profiling;

use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Write;
use std::marker::PhantomData;
use std::path::Path;

use crate::FormatConfig;
use crate::error::{Error, FieldError, HeaderError, ParseError};
use crate::format::{classify, format_column_line, format_data_line, format_header_line, LineKind, DELIMITER, HEADER_SEP};
use crate::headers::{ColumnDefinition, HeaderInfo, TASK_KEY, VERSION_KEY};

/// A format variant known at compile time.
pub trait Variant {
    fn config() -> &'static FormatConfig;
}

/// Collects the header of a new file.
pub struct WriterBuilder<V: Variant> {
    header_info: HeaderInfo,
    overwrite: bool,
    _variant: PhantomData<V>,
}

impl<V: Variant> Default for WriterBuilder<V> {
    fn default() -> Self {
        WriterBuilder {
            header_info: V::config().default_header(),
            overwrite: false,
            _variant: PhantomData,
        }
    }
}

impl<V: Variant> WriterBuilder<V> {
    pub fn new() -> Self {
        WriterBuilder::default()
    }

    /// Set the value of header field `key`
    ///
    /// Terminates with a [HeaderError] if `key` is not declared by the
    /// variant, is `task` or `version`, or if `value` is blank, starts or
    /// ends with whitespace, or contains a `:` or a line break.
    ///
    pub fn set_header(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, Error> {
        let key = key.to_lowercase();
        if key == TASK_KEY || key == VERSION_KEY {
            return Err(HeaderError::ReadOnly { key }.into())
        }
        if value.trim().is_empty() || value.trim() != value || value.contains([HEADER_SEP, '\n', '\r']) {
            return Err(HeaderError::InvalidValue { key, value: value.to_string() }.into())
        }
        if !self.header_info.replace(&key, value) {
            return Err(HeaderError::UnknownKey { key }.into())
        }
        Ok(self)
    }

    pub fn set_contestant_id(
        &mut self,
        value: &str,
    ) -> Result<&mut Self, Error> {
        self.set_header(crate::headers::CONTESTANT_ID_KEY, value)
    }

    pub fn set_sample_id(
        &mut self,
        value: &str,
    ) -> Result<&mut Self, Error> {
        self.set_header(crate::headers::SAMPLE_ID_KEY, value)
    }

    /// Allow [create](WriterBuilder::create) to truncate an existing file.
    pub fn overwrite(
        &mut self,
        overwrite: bool,
    ) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    pub fn header_info(&self) -> &HeaderInfo {
        &self.header_info
    }

    /// Create the file at `path` and write the header to it.
    ///
    /// Terminates with [ParseError::Exists] if `path` exists and overwriting
    /// was not requested. The existing file is not modified. Terminates with
    /// [HeaderError::Unset] if a header field has no value.
    ///
    pub fn create<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Writer<BufWriter<File>>, Error> {
        let path = path.as_ref();
        if !self.overwrite && path.exists() {
            return Err(ParseError::Exists { path: path.to_path_buf() }.into())
        }
        self.check_complete()?;

        let file = if self.overwrite {
            File::create(path)
        } else {
            OpenOptions::new().write(true).create_new(true).open(path)
        };
        let file = file.map_err(|source| match source.kind() {
            ErrorKind::AlreadyExists => ParseError::Exists { path: path.to_path_buf() },
            _ => ParseError::Open { path: path.to_path_buf(), source },
        })?;

        let writer = self.build(BufWriter::new(file))?;
        log::info!("Created CAMI {} file {}", V::config().task, path.display());
        Ok(writer)
    }

    /// Write the header to `conn`.
    ///
    /// Terminates with [HeaderError::Unset] if a header field has no value.
    ///
    pub fn build<W: Write>(
        &self,
        mut conn: W,
    ) -> Result<Writer<W>, Error> {
        self.check_complete()?;
        let config = V::config();

        let mut line_number = 0;
        writeln!(conn, "{}", config.banner)?;
        line_number += 1;
        for (key, value) in self.header_info.iter() {
            writeln!(conn, "{}", format_header_line(key, value))?;
            line_number += 1;
        }
        writeln!(conn, "{}", format_column_line(config.columns))?;
        line_number += 1;

        log::debug!("Wrote {} header fields for task {}", self.header_info.len(), config.task);
        Ok(Writer {
            conn,
            header_info: self.header_info.clone(),
            columns: ColumnDefinition::new(config.columns),
            line_number,
        })
    }

    fn check_complete(&self) -> Result<(), Error> {
        if let Some((key, _)) = self.header_info.iter().find(|(_, value)| value.is_empty()) {
            return Err(HeaderError::Unset { key: key.to_string() }.into())
        }
        Ok(())
    }
}

/// Writes data rows after a committed header.
pub struct Writer<W: Write> {
    conn: W,
    header_info: HeaderInfo,
    columns: ColumnDefinition,
    line_number: usize,
}

impl<W: Write> Writer<W> {
    /// Format a single data row
    ///
    /// Writes the values in `row` separated by the delimiter and followed
    /// by a newline.
    ///
    /// Terminates with a [FieldError] if `row` does not have one value per
    /// column or if a value contains the delimiter or a line break. Rows
    /// that would read back as a comment or a blank line, or that start or
    /// end with whitespace, are also rejected.
    ///
    pub fn write_row<S: AsRef<str>>(
        &mut self,
        row: &[S],
    ) -> Result<(), Error> {
        let line = self.line_number + 1;
        if row.len() != self.columns.len() {
            return Err(FieldError::Count {
                line,
                expected: self.columns.len(),
                found: row.len(),
                content: format_data_line(row),
            }.into())
        }
        if let Some(column) = row.iter().position(|value| value.as_ref().contains([DELIMITER, '\n', '\r'])) {
            return Err(FieldError::Delimiter { line, column }.into())
        }

        let formatted = format_data_line(row);
        if formatted.trim() != formatted || matches!(classify(&formatted), LineKind::Blank | LineKind::Comment) {
            return Err(FieldError::Unreadable { line, content: formatted }.into())
        }

        writeln!(self.conn, "{}", formatted)?;
        self.line_number = line;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.conn.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying output.
    pub fn close(mut self) -> Result<W, Error> {
        self.conn.flush()?;
        log::debug!("Closing writer after {} lines", self.line_number);
        Ok(self.conn)
    }

    pub fn header_info(&self) -> &HeaderInfo {
        &self.header_info
    }

    pub fn column_definition(&self) -> &ColumnDefinition {
        &self.columns
    }

    /// Number of lines written so far, including the header.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
