//! Shared testing utilities for onair CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Unreachable port used where a backend must be configured but never answers.
pub const DEAD_URL: &str = "http://127.0.0.1:9";

/// Isolated working directory plus the backend and stream URLs handed to the CLI.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    api_url: String,
    stream_url: String,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment talking to `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        Self { root, work_dir, api_url: api_url.into(), stream_url: format!("{}/live", DEAD_URL) }
    }

    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Path to the workspace directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Directory the file-backed local store writes into.
    pub fn storage_dir(&self) -> PathBuf {
        self.work_dir.join(".onair")
    }

    /// Write `onair.toml` into the work directory.
    pub fn write_config(&self, content: &str) {
        fs::write(self.work_dir.join("onair.toml"), content).expect("Failed to write onair.toml");
    }

    /// Build a command for invoking the compiled `onair` binary within the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("onair").expect("Failed to locate onair binary");
        cmd.current_dir(&self.work_dir)
            .env("ONAIR_API_URL", &self.api_url)
            .env("ONAIR_STREAM_URL", &self.stream_url)
            .env_remove("ONAIR_CONFIG")
            .env_remove("ONAIR_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }
}
