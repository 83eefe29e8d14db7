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

//! Header metadata and column definitions.
//!
//! The header of a CAMI file consists of [HeaderInfo] and a
//! [ColumnDefinition].
//!
//! ## HeaderInfo
//!
//! Every CAMI file must contain these keys:
//!
//! - `task`: name of the format variant, `binning` or `profiling`.
//! - `version`: format version, currently always `1.0`.
//! - `contestantid`: identifies who produced the file.
//! - `sampleid`: identifies the sample the file describes.
//!
//! In addition, binning files must declare the `referencebased`,
//! `assemblybased` and `replicateinfo` flags, and profiling files must
//! declare `ranks`.
//!
//! Keys and values read from a file are lower-cased. Keys that are not
//! defined by the format are kept when reading but can not be written.
//!
//! ## ColumnDefinition
//!
//! The column names on the `@@` line. Each variant has exactly one valid
//! column definition and every data row must have one value per column.
//!
use indexmap::map::IndexMap;

// Keys common to all variants
pub const TASK_KEY: &str = "task";
pub const VERSION_KEY: &str = "version";
pub const CONTESTANT_ID_KEY: &str = "contestantid";
pub const SAMPLE_ID_KEY: &str = "sampleid";

// Binning
pub const REFERENCE_BASED_KEY: &str = "referencebased";
pub const ASSEMBLY_BASED_KEY: &str = "assemblybased";
pub const REPLICATE_INFO_KEY: &str = "replicateinfo";

// Profiling
pub const RANKS_KEY: &str = "ranks";

/// Keys every CAMI file must declare.
pub const GENERIC_KEYS: [&str; 4] = [TASK_KEY, VERSION_KEY, CONTESTANT_ID_KEY, SAMPLE_ID_KEY];

/// Key/value metadata from the `@key:value` lines.
///
/// Iterates in insertion order. Equality ignores the order of the keys.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    fields: IndexMap<String, String>,
}

impl HeaderInfo {
    pub fn new() -> Self {
        HeaderInfo::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|value| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|key| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Inserts or replaces `key`, returning the previous value.
    pub(crate) fn insert(&mut self, key: &str, value: &str) -> Option<String> {
        self.fields.insert(key.to_string(), value.to_string())
    }

    /// Replaces the value of an existing key. Returns false if `key` is absent.
    pub(crate) fn replace(&mut self, key: &str, value: &str) -> bool {
        match self.fields.get_mut(key) {
            Some(old) => {
                *old = value.to_string();
                true
            },
            None => false,
        }
    }
}

/// Prints one `key=value` line per entry.
impl std::fmt::Display for HeaderInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Ordered column names of the data table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnDefinition {
    names: Vec<String>,
}

impl ColumnDefinition {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        ColumnDefinition { names: names.iter().map(|name| name.as_ref().to_string()).collect() }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True if the names and their order are exactly `expected`.
    pub fn matches(&self, expected: &[&str]) -> bool {
        self.names.len() == expected.len()
            && self.names.iter().zip(expected.iter()).all(|(name, exp)| name == exp)
    }
}

impl std::fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}]", self.names.join(", "))
    }
}
