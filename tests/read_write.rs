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
use std::path::PathBuf;

use cami_io::parser::{binning, profiling};
use cami_io::{Error, DataRow};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

fn read_all_binning(name: &str) -> Result<Vec<DataRow>, Error> {
    binning::open(data_path(name))?.collect()
}

fn read_all_profiling(name: &str) -> Result<Vec<DataRow>, Error> {
    profiling::open(data_path(name))?.collect()
}

#[test]
fn read_valid_files() {
    let binning_rows = read_all_binning("binning-valid.txt").unwrap();
    let profiling_rows = read_all_profiling("profile-valid.txt").unwrap();

    assert_eq!(binning_rows.len(), 5);
    assert_eq!(binning_rows[0], vec!["contig_0001", "562", "bin.1"]);
    assert_eq!(profiling_rows.len(), 12);
    assert_eq!(profiling_rows[11][0], "562");
}

#[test]
fn valid_header_is_lowercased() {
    let reader = binning::open(data_path("binning-valid.txt")).unwrap();

    assert_eq!(reader.header_value("task").unwrap(), "binning");
    assert_eq!(reader.header_value("SAMPLEID").unwrap(), "cami_sample_1");
    assert_eq!(reader.header_value("referencebased").unwrap(), "t");
}

#[test]
fn empty_files_fail_in_header() {
    let got_binning = read_all_binning("binning-empty.txt");
    let got_profiling = read_all_profiling("profile-empty.txt");

    assert!(got_binning.unwrap_err().is_header());
    assert!(got_profiling.unwrap_err().is_header());
}

#[test]
fn invalid_headers_fail() {
    let binning_files = [
        "binning-no-task.txt", "binning-no-ver.txt", "binning-no-coldef.txt",
        "binning-unk-task.txt", "binning-unk-ver.txt",
        "dup-key.txt", "missing-key.txt", "missing-val.txt",
    ];
    let profiling_files = [
        "profile-no-task.txt", "profile-no-ver.txt", "profile-no-coldef.txt",
        "profile-unk-task.txt", "profile-unk-ver.txt",
    ];

    for name in binning_files {
        let got = binning::open(data_path(name));
        assert!(got.is_err_and(|e| e.is_header()), "{} should fail with a header error", name);
    }
    for name in profiling_files {
        let got = profiling::open(data_path(name));
        assert!(got.is_err_and(|e| e.is_header()), "{} should fail with a header error", name);
    }
}

#[test]
fn bad_rows_fail_with_field_error() {
    let got_binning = read_all_binning("binning-bad-row.txt");
    let got_profiling = read_all_profiling("profile-bad-row.txt");

    assert!(got_binning.unwrap_err().is_field());
    assert!(got_profiling.unwrap_err().is_field());
}

#[test]
fn missing_file_fails_with_parse_error() {
    let got = binning::open(data_path("does-not-exist.txt"));

    assert!(got.is_err_and(|e| e.is_parse()));
}

#[test]
fn round_trip_binning() {
    use cami_io::printer::binning::BinningWriterBuilder;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binning-delete.txt");
    std::fs::write(&path, b"previous contents\n").unwrap();

    let reader = binning::open(data_path("binning-valid.txt")).unwrap();
    let header = reader.header_info().clone();

    let mut builder = BinningWriterBuilder::new();
    for (key, value) in header.iter().filter(|(key, _)| *key != "task" && *key != "version") {
        builder.set_header(key, value).unwrap();
    }
    builder.overwrite(true);

    let rows: Vec<DataRow> = reader.map(|row| row.unwrap()).collect();
    let mut writer = builder.create(&path).unwrap();
    for row in rows.iter() {
        writer.write_row(row).unwrap();
    }
    writer.close().unwrap();

    let reread = binning::open(&path).unwrap();
    assert_eq!(reread.header_info(), &header);
    let got: Vec<DataRow> = reread.map(|row| row.unwrap()).collect();
    assert_eq!(got, rows);
}

#[test]
fn round_trip_profiling() {
    use cami_io::printer::profiling::Profiling;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile-delete.txt");

    let n_rows = cami_io::rewrite_file::<Profiling, _, _>(data_path("profile-valid.txt"), &path, false).unwrap();
    assert_eq!(n_rows, 12);

    let expected = profiling::open(data_path("profile-valid.txt")).unwrap();
    let got = profiling::open(&path).unwrap();
    assert_eq!(got.header_info(), expected.header_info());

    let expected_rows: Vec<DataRow> = expected.map(|row| row.unwrap()).collect();
    let got_rows: Vec<DataRow> = got.map(|row| row.unwrap()).collect();
    assert_eq!(got_rows, expected_rows);
}

#[test]
fn no_overwrite() {
    use cami_io::printer::binning::BinningWriterBuilder;
    use cami_io::printer::profiling::ProfilingWriterBuilder;

    let dir = tempfile::tempdir().unwrap();
    let binning_path = dir.path().join("binning-delete.txt");
    let profiling_path = dir.path().join("profile-delete.txt");
    std::fs::write(&binning_path, b"keep\n").unwrap();
    std::fs::write(&profiling_path, b"keep\n").unwrap();

    let mut binning_builder = BinningWriterBuilder::new();
    binning_builder.set_contestant_id("x").unwrap().set_sample_id("y").unwrap();
    let mut profiling_builder = ProfilingWriterBuilder::new();
    profiling_builder.set_contestant_id("x").unwrap().set_sample_id("y").unwrap();

    assert!(binning_builder.create(&binning_path).is_err_and(|e| e.is_parse()));
    assert!(profiling_builder.create(&profiling_path).is_err_and(|e| e.is_parse()));
    assert_eq!(std::fs::read_to_string(&binning_path).unwrap(), "keep\n");
    assert_eq!(std::fs::read_to_string(&profiling_path).unwrap(), "keep\n");
}

#[test]
fn unknown_header_on_write() {
    use cami_io::printer::binning::BinningWriterBuilder;
    use cami_io::printer::profiling::ProfilingWriterBuilder;

    let got_binning = BinningWriterBuilder::new().set_header("foo", "bar").map(|_| ());
    let got_profiling = ProfilingWriterBuilder::new().set_header("foo", "bar").map(|_| ());

    assert!(got_binning.unwrap_err().is_header());
    assert!(got_profiling.unwrap_err().is_header());
}

#[test]
fn bad_field_number_on_write() {
    use cami_io::printer::binning::BinningWriterBuilder;
    use cami_io::printer::profiling::ProfilingWriterBuilder;

    let row = vec!["99"; 20];

    let mut binning_builder = BinningWriterBuilder::new();
    binning_builder.set_contestant_id("x").unwrap().set_sample_id("y").unwrap();
    let mut binning_writer = binning_builder.build(Vec::new()).unwrap();

    let mut profiling_builder = ProfilingWriterBuilder::new();
    profiling_builder.set_contestant_id("x").unwrap().set_sample_id("y").unwrap();
    let mut profiling_writer = profiling_builder.build(Vec::new()).unwrap();

    assert!(binning_writer.write_row(&row).unwrap_err().is_field());
    assert!(profiling_writer.write_row(&row).unwrap_err().is_field());
}
