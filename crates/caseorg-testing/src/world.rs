//! Isolated environment for CLI integration tests.

use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Address nothing listens on; requests fail fast with a transport error
pub const UNREACHABLE_SERVER: &str = "http://127.0.0.1:9";

/// Temporary data directory plus the flags that point the CLI at it.
///
/// # Example
/// ```no_run
/// use caseorg_testing::TestWorld;
///
/// let world = TestWorld::new().with_config("[viewer]\nelevated = true\n");
/// let mut cmd = assert_cmd::Command::cargo_bin("caseorg").unwrap();
/// world.configure_command(&mut cmd).arg("tree");
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    server: Option<String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".caseorg");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            data_dir,
            server: None,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `config.toml` into the data directory
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.data_dir.join("config.toml"), toml).expect("Failed to write config");
        self
    }

    /// Pass `--server` on every command
    pub fn with_server(mut self, url: &str) -> Self {
        self.server = Some(url.to_string());
        self
    }

    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        if let Some(server) = &self.server {
            cmd.arg("--server").arg(server);
        }
        cmd.env_remove("CASEORG_PATH").env_remove("RUST_LOG");
        cmd
    }

    /// Files the CLI left in the data directory
    pub fn data_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            names.push(entry?.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }
}
