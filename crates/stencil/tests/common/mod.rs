//! Shared scenario support for the CLI integration tests
//!
//! A [`Scenario`] owns one generated application: the temp directory it
//! lives in, the entries the generator reported, and the captured output
//! of the run. The directory is removed when the scenario drops.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use stencil_core::scaffold::parse_created_files;
use tempfile::TempDir;

pub struct Scenario {
    dir: TempDir,
    pub entries: Vec<String>,
    pub stdout: String,
    pub stderr: String,
}

impl Scenario {
    /// Run the generator with `args` in a fresh temp directory, asserting
    /// exit 0, and capture the outcome.
    pub fn generate(args: &[&str]) -> Self {
        let dir = TempDir::new().expect("create scenario directory");
        let assert = assert_cmd::Command::cargo_bin("stencil")
            .expect("binary builds")
            .current_dir(dir.path())
            .args(args)
            .assert()
            .success();
        let output = assert.get_output();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Self {
            dir,
            entries: parse_created_files(&stdout),
            stdout,
            stderr,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Read a file relative to the scenario directory.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.dir.path().join(rel))
            .unwrap_or_else(|err| panic!("read {rel}: {err}"))
    }

    pub fn has_entry(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Stderr lines carrying a `warning:` notice.
    pub fn warning_lines(&self) -> Vec<&str> {
        self.stderr
            .lines()
            .filter(|l| l.contains("warning:"))
            .collect()
    }
}
