//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which keeps a resume namespace in a temporary
//! directory and opens [`Session`]s against it, so "visits" can be repeated
//! across simulated process restarts.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tvreel::config::Config;
use tvreel::resume::{JsonFileStore, ResumeStore};
use tvreel::session::{parse_script, Session};

/// URI of the first bundled video under the default media base.
pub const VIDEO1: &str = "resource://tvreel/raw/video1";

/// Test harness wrapping a temporary data directory and a configuration.
pub struct TestHarness {
    pub dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    /// Harness with default policy, no buffering and the given duration.
    pub fn new(duration_ms: Option<u64>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.player.duration_ms = duration_ms;
        config.player.buffering_ms = 0;
        Self { dir, config }
    }

    pub fn namespace_path(&self) -> PathBuf {
        self.config.storage.namespace_path()
    }

    /// Open the on-disk store as a fresh process would.
    pub fn store(&self) -> ResumeStore {
        let store = JsonFileStore::open(self.namespace_path()).expect("failed to open store");
        ResumeStore::new(Arc::new(store))
    }

    /// New session over a freshly reopened store.
    pub fn session(&self) -> Session {
        Session::new(&self.config, self.store())
    }

    /// Run a remote script in a fresh session and return its transcript.
    pub fn run_script(&self, script: &str) -> Vec<String> {
        let commands = parse_script(script).expect("invalid script");
        let mut session = self.session();
        session.run(&commands)
    }

    /// Write a TOML config pointing at the temp data directory.
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let path = self.dir.path().join("tvreel.toml");
        let content = format!(
            "[storage]\ndata_dir = {:?}\n\n[player]\nbuffering_ms = 0\n{}\n",
            self.dir.path().display().to_string(),
            extra
        );
        std::fs::write(&path, content).expect("failed to write config");
        path
    }
}
