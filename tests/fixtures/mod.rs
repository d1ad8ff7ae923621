//! Job document fixtures for wire-format tests
//!
//! - `explicit_job.json`: every base field plus a parametric sweep
//! - `templated_job.json`: application template with non-reserved fields
//! - `templated_conflict.json`: template mixed with reserved fields
//! - `missing_pool.json`: no `poolInfo`

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Directory holding the job fixtures
pub fn jobs_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/jobs")
}

/// Path to a named job fixture
pub fn job_path(name: &str) -> PathBuf {
    jobs_dir().join(name)
}

/// Raw contents of a named job fixture
pub fn load_job_str(name: &str) -> String {
    let path = job_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {:?}: {}", path, e))
}

/// Parsed JSON of a named job fixture
pub fn load_job_value(name: &str) -> serde_json::Value {
    serde_json::from_str(&load_job_str(name)).expect("fixture is valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_exist() {
        for name in [
            "explicit_job.json",
            "templated_job.json",
            "templated_conflict.json",
            "missing_pool.json",
        ] {
            assert!(job_path(name).exists(), "fixture {} not found", name);
        }
    }
}
