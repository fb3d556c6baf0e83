use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Base location of the bundled media (`<base>/video1` .. `<base>/video3`)
    #[serde(default = "default_resource_base")]
    pub resource_base: String,
}

fn default_resource_base() -> String {
    "resource://tvreel/raw".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            resource_base: default_resource_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the persistent namespaces
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Namespace of the resume positions (file `<data_dir>/<namespace>.json`)
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(shellexpand::tilde("~/.local/share/tvreel").as_ref())
}

fn default_namespace() -> String {
    "resume_positions".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            namespace: default_namespace(),
        }
    }
}

impl StorageConfig {
    /// Path of the namespace file.
    pub fn namespace_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.namespace))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Saved positions below this are ignored and never prompt
    #[serde(default = "default_resume_min_ms")]
    pub resume_min_ms: u64,

    /// Remaining time at or below which playback counts as finished
    #[serde(default = "default_clear_if_within_ms")]
    pub clear_if_within_ms: u64,

    /// Step for left/right seeking
    #[serde(default = "default_seek_step_ms")]
    pub seek_step_ms: u64,

    /// Periodic save interval while playing (0 disables)
    #[serde(default)]
    pub checkpoint_interval_ms: u64,
}

fn default_resume_min_ms() -> u64 {
    1_000
}
fn default_clear_if_within_ms() -> u64 {
    5_000
}
fn default_seek_step_ms() -> u64 {
    10_000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            resume_min_ms: default_resume_min_ms(),
            clear_if_within_ms: default_clear_if_within_ms(),
            seek_step_ms: default_seek_step_ms(),
            checkpoint_interval_ms: 0,
        }
    }
}

/// Settings of the simulated media component driven by the CLI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Reported media duration; absent means the duration stays unknown
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Virtual time spent buffering after `prepare`
    #[serde(default = "default_buffering_ms")]
    pub buffering_ms: u64,

    /// URIs that report a playback error once buffering completes
    #[serde(default)]
    pub fail_uris: Vec<String>,
}

fn default_buffering_ms() -> u64 {
    500
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            duration_ms: None,
            buffering_ms: default_buffering_ms(),
            fail_uris: Vec::new(),
        }
    }
}
