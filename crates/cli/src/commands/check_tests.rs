// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the check command

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn check(contents: &str) -> Result<()> {
    let file = config_file(contents);
    handle(CheckArgs {
        config: file.path().to_path_buf(),
    })
}

#[test]
fn valid_config_passes() {
    let result = check(
        r#"
[producer]
job_name = "p"
entity_count = 10
attribute_count = 3
run_duration = "5s"

[consumer]
job_name = "c"
run_duration = "5s"
"#,
    );
    assert!(result.is_ok());
}

#[test]
fn config_without_jobs_fails() {
    assert!(check("[broker]\ntopic = \"payloads\"\n").is_err());
}

#[test]
fn zero_entity_count_fails() {
    let result = check(
        r#"
[producer]
entity_count = 0
"#,
    );
    assert!(result.is_err());
}

#[test]
fn unparsable_config_fails() {
    assert!(check("not toml at all [").is_err());
}
