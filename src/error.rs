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

//! Errors raised while reading or writing CAMI files.
//!
//! Every failure is an [Error], which wraps one of three kinds:
//!
//!   - [HeaderError]: the metadata block or the column definition is invalid.
//!   - [FieldError]: a data line has the wrong number of fields, or a row
//!     can not be written so that it reads back unchanged.
//!   - [ParseError]: the file could not be opened, already exists, or an
//!     I/O operation failed mid-stream.
//!
use std::path::PathBuf;

/// Problems in the metadata block or column definition line.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("malformed header line:{line} [{content}]")]
    Malformed { line: usize, content: String },

    #[error("header does not appear to contain a key. line:{line} [{content}]")]
    MissingKey { line: usize, content: String },

    #[error("header does not appear to contain a value. line:{line} [{content}]")]
    MissingValue { line: usize, content: String },

    #[error("duplicate header key used. line:{line} [{content}]")]
    DuplicateKey { line: usize, content: String },

    #[error("reader does not support {key} '{value}', expected one of [{}]. line:{line}", .supported.join(", "))]
    Unsupported { line: usize, key: String, value: String, supported: Vec<String> },

    #[error("mandatory header field {key} was not found")]
    MissingMandatory { key: String },

    #[error("column definition incorrect at line:{line} [{}], should be [{}]", .found.join(", "), .expected.join(", "))]
    ColumnMismatch { line: usize, found: Vec<String>, expected: Vec<String> },

    #[error("incomplete header, file ended at line:{line}")]
    Incomplete { line: usize },

    #[error("data line before column definition. line:{line} [{content}]")]
    UnexpectedData { line: usize, content: String },

    #[error("unknown header info field {key}")]
    UnknownKey { key: String },

    #[error("invalid value for header field {key} [{value}]")]
    InvalidValue { key: String, value: String },

    #[error("header field {key} has no value")]
    Unset { key: String },

    #[error("header field {key} is fixed by the format variant")]
    ReadOnly { key: String },

    #[error("header field {key} is not present")]
    NotFound { key: String },
}

/// Data rows that disagree with the column definition.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("incorrect number of fields for line:{line}, expected {expected} but found {found} [{content}]")]
    Count { line: usize, expected: usize, found: usize, content: String },

    #[error("value in column {column} contains a delimiter or line break. line:{line}")]
    Delimiter { line: usize, column: usize },

    #[error("row would be read back as a comment, a blank line or with whitespace removed. line:{line} [{content}]")]
    Unreadable { line: usize, content: String },
}

/// Failures to open, create or read the underlying file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not open {}: {source}", .path.display())]
    Open { path: PathBuf, source: std::io::Error },

    #[error("output file {} already exists", .path.display())]
    Exists { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Base error for all CAMI format operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Parse(ParseError::Io(e))
    }
}

impl Error {
    pub fn is_header(&self) -> bool {
        matches!(self, Error::Header(_))
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Error::Field(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn io_error_is_parse_error() {
        use super::Error;

        let err: Error = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof").into();

        assert!(err.is_parse());
        assert!(!err.is_header());
        assert!(!err.is_field());
    }

    #[test]
    fn field_error_message_names_line() {
        use super::Error;
        use super::FieldError;

        let err: Error = FieldError::Count { line: 12, expected: 3, found: 2, content: "read001\t123".to_string() }.into();

        assert!(err.is_field());
        assert_eq!(err.to_string(), "incorrect number of fields for line:12, expected 3 but found 2 [read001\t123]");
    }

    #[test]
    fn unsupported_lists_supported_values() {
        use super::HeaderError;

        let err = HeaderError::Unsupported { line: 3, key: "version".to_string(), value: "2.0".to_string(), supported: vec!["1.0".to_string()] };

        assert_eq!(err.to_string(), "reader does not support version '2.0', expected one of [1.0]. line:3");
    }
}
