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

use crate::BINNING;
use crate::error::{Error, HeaderError};
use crate::headers::HeaderInfo;
use crate::headers::{ASSEMBLY_BASED_KEY, REFERENCE_BASED_KEY, REPLICATE_INFO_KEY};
use crate::parser::Reader;

impl<R: BufRead> Reader<R> {
    /// Reads the header of a binning file from `conn`.
    pub fn binning(
        conn: R,
    ) -> Result<Self, Error> {
        Reader::new(conn, &BINNING)
    }
}

/// Open a binning file
///
/// Reads the header of the file at `path` as a *binning* file.
///
pub fn open<P: AsRef<Path>>(
    path: P,
) -> Result<Reader<Box<dyn BufRead>>, Error> {
    Reader::from_path(path, &BINNING)
}

/// The `T`/`F` flags of a binning header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinningFlags {
    pub reference_based: bool,
    pub assembly_based: bool,
    pub replicate_info: bool,
}

/// Converts the `referencebased`, `assemblybased` and `replicateinfo`
/// header values to booleans.
///
/// Terminates with a [HeaderError] if a flag is absent or is not `T` or `F`.
///
pub fn read_flags(
    header: &HeaderInfo,
) -> Result<BinningFlags, Error> {
    Ok(BinningFlags {
        reference_based: read_flag(header, REFERENCE_BASED_KEY)?,
        assembly_based: read_flag(header, ASSEMBLY_BASED_KEY)?,
        replicate_info: read_flag(header, REPLICATE_INFO_KEY)?,
    })
}

fn read_flag(
    header: &HeaderInfo,
    key: &str,
) -> Result<bool, HeaderError> {
    let value = header.get(key).ok_or_else(|| HeaderError::NotFound { key: key.to_string() })?;
    match value {
        "t" | "T" => Ok(true),
        "f" | "F" => Ok(false),
        _ => Err(HeaderError::InvalidValue { key: key.to_string(), value: value.to_string() }),
    }
}
