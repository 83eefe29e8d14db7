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

//! Line grammar shared by [Reader](crate::parser::Reader) and [Writer](crate::printer::Writer).
//!
//! A CAMI file consists of these line types:
//!
//!   - Comment lines, `# a comment`.
//!   - Blank lines, containing only whitespace.
//!   - Header lines carrying metadata, `@key:value`.
//!   - The column definition line, `@@SEQUENCEID<tab>TAXID<tab>BINID`,
//!     which ends the header.
//!   - Data lines, `read001<tab>123<tab>321`.
//!
//! Comment and blank lines may appear anywhere and are ignored.
//!
use crate::error::HeaderError;

pub const COMMENT_CHAR: char = '#';
pub const HEADER_CHAR: char = '@';
pub const COLUMNS_PREFIX: &str = "@@";
pub const DELIMITER: char = '\t';
pub const HEADER_SEP: char = ':';

/// Separates the ranks in the value of `@ranks`.
pub const RANKS_SEP: char = '|';

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Header,
    Columns,
    Data,
}

/// Classifies `line` ignoring surrounding whitespace.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();
    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with(COMMENT_CHAR) {
        LineKind::Comment
    } else if line.starts_with(COLUMNS_PREFIX) {
        LineKind::Columns
    } else if line.starts_with(HEADER_CHAR) {
        LineKind::Header
    } else {
        LineKind::Data
    }
}

/// Removes the trailing `\n` or `\r\n` from `line`.
pub fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Parse a header line
///
/// Splits `@key:value` into a lower-cased `(key, value)` pair.
///
/// Terminates with a [HeaderError] if the line is shorter than 4 characters,
/// does not contain exactly one `:`, or if either the key or the value is
/// empty. `line_number` is only used in the error.
///
pub fn parse_header_line(
    line: &str,
    line_number: usize,
) -> Result<(String, String), HeaderError> {
    let line = line.trim();
    if line.len() < 4 || line.matches(HEADER_SEP).count() != 1 {
        return Err(HeaderError::Malformed { line: line_number, content: line.to_string() })
    }

    let body = line.strip_prefix(HEADER_CHAR).unwrap_or(line);
    let (key, value) = body.split_once(HEADER_SEP)
        .ok_or_else(|| HeaderError::Malformed { line: line_number, content: line.to_string() })?;

    if key.is_empty() {
        return Err(HeaderError::MissingKey { line: line_number, content: line.to_string() })
    }
    if value.is_empty() {
        return Err(HeaderError::MissingValue { line: line_number, content: line.to_string() })
    }

    Ok((key.to_lowercase(), value.to_lowercase()))
}

/// Returns the column names from a `@@` line.
pub fn parse_column_line(
    line: &str,
) -> Vec<String> {
    let line = line.trim();
    let names = line.strip_prefix(COLUMNS_PREFIX).unwrap_or(line);
    names.split(DELIMITER).map(|name| name.to_string()).collect()
}

/// Splits a data line on the delimiter after removing surrounding whitespace.
///
/// A trailing delimiter is whitespace too, so `a<tab>b<tab>` has two fields.
pub fn split_fields(
    line: &str,
) -> Vec<String> {
    line.trim().split(DELIMITER).map(|field| field.to_string()).collect()
}

pub fn format_header_line(key: &str, value: &str) -> String {
    format!("{}{}{}{}", HEADER_CHAR, key, HEADER_SEP, value)
}

pub fn format_column_line<S: AsRef<str>>(columns: &[S]) -> String {
    let mut formatted = COLUMNS_PREFIX.to_string();
    formatted += &join_fields(columns);
    formatted
}

pub fn format_data_line<S: AsRef<str>>(fields: &[S]) -> String {
    join_fields(fields)
}

fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    let mut joined = String::new();
    fields.iter().enumerate().for_each(|(idx, field)| {
        if idx > 0 {
            joined.push(DELIMITER);
        }
        joined += field.as_ref();
    });
    joined
}
