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
use crate::PROFILING;
use crate::FormatConfig;
use crate::error::Error;
use crate::format::RANKS_SEP;
use crate::headers::RANKS_KEY;
use crate::printer::{Variant, WriterBuilder};

/// Taxonomic profiling variant, `@task:profiling`.
#[derive(Debug, Clone, Copy)]
pub struct Profiling;

impl Variant for Profiling {
    fn config() -> &'static FormatConfig {
        &PROFILING
    }
}

pub type ProfilingWriterBuilder = WriterBuilder<Profiling>;

impl WriterBuilder<Profiling> {
    /// Set the ranks used in the profile
    ///
    /// The ranks are written as a single `|` separated value.
    ///
    /// Terminates with a [HeaderError](crate::error::HeaderError) if `ranks`
    /// is empty or a rank contains a `:` or a line break.
    ///
    pub fn set_ranks<S: AsRef<str>>(
        &mut self,
        ranks: &[S],
    ) -> Result<&mut Self, Error> {
        let mut value = String::new();
        ranks.iter().enumerate().for_each(|(idx, rank)| {
            if idx > 0 {
                value.push(RANKS_SEP);
            }
            value += rank.as_ref();
        });
        self.set_header(RANKS_KEY, &value)
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn default_ranks() {
        use super::ProfilingWriterBuilder;
        use crate::parser::profiling::read_ranks;

        let builder = ProfilingWriterBuilder::new();
        let got = read_ranks(builder.header_info()).unwrap();

        assert_eq!(got, vec!["superkingdom", "phylum", "class", "order", "family", "genus", "species", "strain"]);
    }

    #[test]
    fn set_ranks_joins_with_pipe() {
        use super::ProfilingWriterBuilder;

        let mut builder = ProfilingWriterBuilder::new();
        builder.set_ranks(&["genus", "species"]).unwrap();

        assert_eq!(builder.header_info().get("ranks"), Some("genus|species"));
    }

    #[test]
    fn set_ranks_empty() {
        use super::ProfilingWriterBuilder;
        use crate::error::{Error, HeaderError};

        let mut builder = ProfilingWriterBuilder::new();
        let got = builder.set_ranks::<&str>(&[]);

        assert!(matches!(got, Err(Error::Header(HeaderError::InvalidValue { .. }))));
    }

    #[test]
    fn binning_flags_not_declared() {
        use super::ProfilingWriterBuilder;
        use crate::error::{Error, HeaderError};

        let mut builder = ProfilingWriterBuilder::new();
        let got = builder.set_header("referencebased", "T");

        assert!(matches!(got, Err(Error::Header(HeaderError::UnknownKey { .. }))));
    }

    #[test]
    fn write_profile() {
        use super::ProfilingWriterBuilder;

        let mut builder = ProfilingWriterBuilder::new();
        builder.set_contestant_id("x").unwrap()
               .set_sample_id("y").unwrap()
               .set_ranks(&["genus", "species"]).unwrap();

        let mut writer = builder.build(Vec::new()).unwrap();
        writer.write_row(&["561", "genus", "561", "Escherichia", "100.0"]).unwrap();
        let got = writer.close().unwrap();

        let expected = b"#CAMI Format for Profiling\n@task:profiling\n@version:1.0\n@contestantid:x\n@sampleid:y\n@ranks:genus|species\n@@TAXID\tRANK\tTAXPATH\tTAXPATH_SN\tPERCENTAGE\n561\tgenus\t561\tEscherichia\t100.0\n".to_vec();

        assert_eq!(got, expected);
    }
}
