#![allow(dead_code)]

use std::path::PathBuf;

pub fn get_test_fixture_path(kind: &str, fixture_name: Option<&str>) -> PathBuf {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(kind);
    match fixture_name {
        Some(fixture_name) => base.join(fixture_name),
        None => base,
    }
}

pub fn read_fixture(kind: &str, fixture_name: &str) -> String {
    let path = get_test_fixture_path(kind, Some(fixture_name));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()))
}
