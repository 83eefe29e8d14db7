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
use crate::BINNING;
use crate::FormatConfig;
use crate::error::Error;
use crate::headers::{ASSEMBLY_BASED_KEY, REFERENCE_BASED_KEY, REPLICATE_INFO_KEY};
use crate::printer::{Variant, WriterBuilder};

const TRUE_FLAG: &str = "T";

/// Binning variant, `@task:binning`.
#[derive(Debug, Clone, Copy)]
pub struct Binning;

impl Variant for Binning {
    fn config() -> &'static FormatConfig {
        &BINNING
    }
}

pub type BinningWriterBuilder = WriterBuilder<Binning>;

impl WriterBuilder<Binning> {
    /// Marks the binning as based on reference genomes.
    pub fn set_reference_based(&mut self) -> Result<&mut Self, Error> {
        self.set_header(REFERENCE_BASED_KEY, TRUE_FLAG)
    }

    /// Marks the binning as based on an assembly.
    pub fn set_assembly_based(&mut self) -> Result<&mut Self, Error> {
        self.set_header(ASSEMBLY_BASED_KEY, TRUE_FLAG)
    }

    /// Marks the binning as using replicate information.
    pub fn set_replicate_info(&mut self) -> Result<&mut Self, Error> {
        self.set_header(REPLICATE_INFO_KEY, TRUE_FLAG)
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn default_flags_are_false() {
        use super::BinningWriterBuilder;

        let builder = BinningWriterBuilder::new();

        assert_eq!(builder.header_info().get("referencebased"), Some("F"));
        assert_eq!(builder.header_info().get("assemblybased"), Some("F"));
        assert_eq!(builder.header_info().get("replicateinfo"), Some("F"));
    }

    #[test]
    fn set_flags() {
        use super::BinningWriterBuilder;
        use crate::parser::binning::read_flags;
        use crate::parser::binning::BinningFlags;

        let mut builder = BinningWriterBuilder::new();
        builder.set_assembly_based().unwrap().set_replicate_info().unwrap();

        let got = read_flags(builder.header_info()).unwrap();

        assert_eq!(got, BinningFlags { reference_based: false, assembly_based: true, replicate_info: true });
    }

    #[test]
    fn write_binning_example() {
        use super::BinningWriterBuilder;
        use crate::parser::Reader;
        use std::io::Cursor;

        let mut builder = BinningWriterBuilder::new();
        builder.set_contestant_id("x").unwrap()
               .set_sample_id("y").unwrap()
               .set_reference_based().unwrap();

        let mut writer = builder.build(Cursor::new(Vec::new())).unwrap();
        writer.write_row(&["read001", "123", "321"]).unwrap();
        writer.write_row(&["read002".to_string(), "124".to_string(), "322".to_string()]).unwrap();
        let written = writer.close().unwrap().into_inner();

        let reader = Reader::binning(Cursor::new(written)).unwrap();
        assert!(reader.header_info().keys().eq(builder.header_info().keys()));
        assert_eq!(reader.header_value("referencebased").unwrap(), "t");

        let got: Vec<Vec<String>> = reader.map(|row| row.unwrap()).collect();
        assert_eq!(got, vec![vec!["read001", "123", "321"], vec!["read002", "124", "322"]]);
    }
}
