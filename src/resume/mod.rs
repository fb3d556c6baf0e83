//! Resume positions: key derivation, the persistent store handle and the
//! save/prompt/clear policy.

pub mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use crate::config::PlaybackConfig;
use std::fmt;
use std::sync::Arc;

/// Prefix of every resume key.
pub const KEY_PREFIX: &str = "pos_";

/// Derive the resume key for a media URI.
///
/// The suffix is the 32-bit polynomial string hash (`h = 31 * h + c` over UTF-16
/// code units, wrapping), so keys match stores written by earlier releases.
/// Distinct URIs can collide and would then share one resume position.
pub fn key_for(uri: &str) -> String {
    let hash = uri
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)));
    format!("{KEY_PREFIX}{hash}")
}

/// Handle to the resume namespace.
///
/// Cloning is cheap; all clones see the same underlying store. Storage failures
/// are logged and never reach the caller.
#[derive(Clone)]
pub struct ResumeStore {
    inner: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for ResumeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeStore").finish_non_exhaustive()
    }
}

impl ResumeStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Store backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Upsert the position for `key`.
    pub fn save(&self, key: &str, position_ms: u64) {
        match self.inner.set(key, position_ms) {
            Ok(()) => tracing::debug!("Saved resume position {} = {}ms", key, position_ms),
            Err(e) => tracing::warn!("Failed to save resume position {}: {}", key, e),
        }
    }

    /// Saved position for `key`, or 0 when there is none.
    pub fn load(&self, key: &str) -> u64 {
        match self.inner.get(key) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                tracing::warn!("Failed to load resume position {}: {}", key, e);
                0
            }
        }
    }

    /// Remove the position for `key` if present.
    pub fn clear(&self, key: &str) {
        match self.inner.delete(key) {
            Ok(()) => tracing::debug!("Cleared resume position {}", key),
            Err(e) => tracing::warn!("Failed to clear resume position {}: {}", key, e),
        }
    }

    pub fn key_for(&self, uri: &str) -> String {
        key_for(uri)
    }
}

/// What a position capture does to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Overwrite the record with this position.
    Save(u64),
    /// Playback is effectively finished; drop the record.
    Clear,
}

/// Thresholds deciding when to prompt and when a video counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePolicy {
    pub resume_min_ms: u64,
    pub clear_if_within_ms: u64,
}

impl Default for ResumePolicy {
    fn default() -> Self {
        Self::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for ResumePolicy {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            resume_min_ms: config.resume_min_ms,
            clear_if_within_ms: config.clear_if_within_ms,
        }
    }
}

impl ResumePolicy {
    /// Whether a saved position is worth asking about.
    pub fn should_prompt(&self, saved_ms: u64) -> bool {
        saved_ms > 0 && saved_ms >= self.resume_min_ms
    }

    /// Decide what to persist for a captured position.
    ///
    /// With an unknown duration the raw position is always saved.
    pub fn commit(&self, position_ms: u64, duration_ms: Option<u64>) -> Commit {
        match duration_ms {
            Some(duration) if duration > 0 => {
                if duration.saturating_sub(position_ms) <= self.clear_if_within_ms {
                    Commit::Clear
                } else {
                    Commit::Save(position_ms)
                }
            }
            _ => Commit::Save(position_ms),
        }
    }

    /// Apply [`ResumePolicy::commit`] to `store`.
    pub fn apply(
        &self,
        store: &ResumeStore,
        key: &str,
        position_ms: u64,
        duration_ms: Option<u64>,
    ) -> Commit {
        let commit = self.commit(position_ms, duration_ms);
        match commit {
            Commit::Save(position) => store.save(key, position),
            Commit::Clear => store.clear(key),
        }
        commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_for_matches_known_hashes() {
        assert_eq!(key_for(""), "pos_0");
        assert_eq!(key_for("a"), "pos_97");
        assert_eq!(key_for("hello"), "pos_99162322");
        // Wraps past i32::MAX like the stored keys of earlier releases.
        assert_eq!(key_for("hello world"), "pos_1794106052");
        assert_eq!(key_for("resource://tvreel/raw/video1"), key_for("resource://tvreel/raw/video1"));
    }

    #[test]
    fn test_key_for_is_deterministic() {
        let uri = "resource://tvreel/raw/video2";
        assert_eq!(key_for(uri), key_for(uri));
        assert_ne!(key_for(uri), key_for("resource://tvreel/raw/video3"));
        assert!(key_for(uri).starts_with(KEY_PREFIX));
    }

    #[test]
    fn test_key_for_known_collision() {
        // "Aa" and "BB" share a hash; their resume state would merge.
        assert_eq!(key_for("Aa"), key_for("BB"));
    }

    #[test]
    fn test_store_defaults_to_zero() {
        let store = ResumeStore::in_memory();
        assert_eq!(store.load("pos_123"), 0);

        store.save("pos_123", 42_000);
        assert_eq!(store.load("pos_123"), 42_000);

        store.clear("pos_123");
        store.clear("pos_123");
        assert_eq!(store.load("pos_123"), 0);
    }

    #[test]
    fn test_store_clones_share_state() {
        let store = ResumeStore::in_memory();
        let other = store.clone();
        store.save("pos_1", 5_000);
        assert_eq!(other.load("pos_1"), 5_000);
    }

    #[test]
    fn test_should_prompt_threshold() {
        let policy = ResumePolicy::default();
        assert!(!policy.should_prompt(0));
        assert!(!policy.should_prompt(999));
        assert!(policy.should_prompt(1_000));
        assert!(policy.should_prompt(42_000));
    }

    #[test]
    fn test_commit_boundaries() {
        let policy = ResumePolicy::default();
        assert_eq!(policy.commit(94_000, Some(100_000)), Commit::Save(94_000));
        assert_eq!(policy.commit(96_000, Some(100_000)), Commit::Clear);
        assert_eq!(policy.commit(95_000, Some(100_000)), Commit::Clear);
        assert_eq!(policy.commit(55_001, Some(60_000)), Commit::Clear);
        assert_eq!(policy.commit(54_999, Some(60_000)), Commit::Save(54_999));
    }

    #[test]
    fn test_commit_unknown_duration_saves_raw_position() {
        let policy = ResumePolicy::default();
        assert_eq!(policy.commit(42_000, None), Commit::Save(42_000));
        assert_eq!(policy.commit(42_000, Some(0)), Commit::Save(42_000));
    }

    #[test]
    fn test_commit_position_past_duration_clears() {
        let policy = ResumePolicy::default();
        assert_eq!(policy.commit(120_000, Some(100_000)), Commit::Clear);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let policy = ResumePolicy::default();
        let store = ResumeStore::in_memory();

        policy.apply(&store, "pos_1", 30_000, Some(100_000));
        let once = store.load("pos_1");
        policy.apply(&store, "pos_1", 30_000, Some(100_000));
        assert_eq!(store.load("pos_1"), once);

        policy.apply(&store, "pos_1", 99_000, Some(100_000));
        assert_eq!(store.load("pos_1"), 0);
    }
}
