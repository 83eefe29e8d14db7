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
use std::io::BufRead;
use std::path::Path;

use crate::PROFILING;
use crate::error::{Error, HeaderError};
use crate::format::RANKS_SEP;
use crate::headers::HeaderInfo;
use crate::headers::RANKS_KEY;
use crate::parser::Reader;

impl<R: BufRead> Reader<R> {
    /// Reads the header of a profiling file from `conn`.
    pub fn profiling(
        conn: R,
    ) -> Result<Self, Error> {
        Reader::new(conn, &PROFILING)
    }
}

/// Open a profiling file
///
/// Reads the header of the file at `path` as a *profiling* file.
///
pub fn open<P: AsRef<Path>>(
    path: P,
) -> Result<Reader<Box<dyn BufRead>>, Error> {
    Reader::from_path(path, &PROFILING)
}

/// Splits the `ranks` header value into the rank names.
pub fn read_ranks(
    header: &HeaderInfo,
) -> Result<Vec<String>, Error> {
    let ranks = header.get(RANKS_KEY).ok_or_else(|| HeaderError::NotFound { key: RANKS_KEY.to_string() })?;
    Ok(ranks.split(RANKS_SEP).map(|rank| rank.to_string()).collect())
}
