//! File-backed fingerprint cache.
//!
//! [`ChangeCache`] keeps the whole map in memory for the duration of a build.
//! It is read once at the start and rewritten in full at the end:
//!
//! ```text
//! {
//!     "docs/grammar/select.bnf": "9f86d081884c7d65...",
//!     "docs/grammar/insert.bnf": "2c26b46b68ffc68f..."
//! }
//! ```
//!
//! Keys are written in sorted order with a 4-space indent and a single
//! trailing newline so the file diffs cleanly when checked into a repository.
//! The file is replaced atomically: content goes to a temporary file in the
//! same directory which is then renamed over the previous cache.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::CacheError;

/// Persisted mapping from input path to its last processed fingerprint.
#[derive(Debug, Clone)]
pub struct ChangeCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl ChangeCache {
    /// Load the cache stored at `path`.
    ///
    /// A missing or unreadable file is an error, as is content that is not a
    /// JSON object of strings. Starting over without the stored fingerprints
    /// is an explicit decision, see [`ChangeCache::empty`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|source| CacheError::Parse {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            "loaded {} fingerprints from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    /// Create an empty cache that will be persisted to `path`.
    ///
    /// Every input is processed against an empty cache.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Whether an input with this fingerprint needs processing.
    ///
    /// Returns `true` when the key has never been recorded or was recorded with
    /// a different fingerprint.
    #[must_use]
    pub fn should_process(&self, key: &str, fingerprint: &str) -> bool {
        self.entries.get(key).is_none_or(|stored| stored != fingerprint)
    }

    /// Record the fingerprint of a processed input. Last write wins.
    pub fn record(&mut self, key: impl Into<String>, fingerprint: impl Into<String>) {
        self.entries.insert(key.into(), fingerprint.into());
    }

    /// Stored fingerprint for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of recorded inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no inputs are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Location the cache is loaded from and persisted to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the cache in its on-disk form.
    pub fn to_json(&self) -> Result<String, CacheError> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.entries.serialize(&mut serializer)?;
        buf.push(b'\n');

        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Atomically rewrite the cache file with the full in-memory map.
    pub fn persist(&self) -> Result<(), CacheError> {
        let json = self.to_json()?;
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(
            "persisted {} fingerprints to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_cache_processes_everything() {
        let cache = ChangeCache::empty("unused.json");

        assert!(cache.should_process("a.bnf", "00"));
        assert!(cache.should_process("", ""));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_record_then_should_process() {
        let mut cache = ChangeCache::empty("unused.json");
        cache.record("docs/a.bnf", "abc");

        assert!(!cache.should_process("docs/a.bnf", "abc"));
        assert!(cache.should_process("docs/a.bnf", "abd"));
        assert!(cache.should_process("docs/b.bnf", "abc"));
    }

    #[test]
    fn test_record_last_write_wins() {
        let mut cache = ChangeCache::empty("unused.json");
        cache.record("a.bnf", "first");
        cache.record("a.bnf", "second");

        assert_eq!(cache.get("a.bnf"), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let result = ChangeCache::load(tmp.path().join("missing.json"));

        assert!(matches!(result, Err(CacheError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ChangeCache::load(&path).unwrap_err();
        assert!(matches!(err, CacheError::Parse { .. }));
        assert!(err.to_string().contains("cache.json"));
    }

    #[test]
    fn test_load_rejects_non_string_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        fs::write(&path, r#"{"a.bnf": 42}"#).unwrap();

        assert!(matches!(
            ChangeCache::load(&path),
            Err(CacheError::Parse { .. })
        ));
    }

    #[test]
    fn test_persist_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        let mut cache = ChangeCache::empty(&path);
        cache.record("src/b.bnf", "bb");
        cache.record("src/a.bnf", "aa");

        cache.persist().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n    \"src/a.bnf\": \"aa\",\n    \"src/b.bnf\": \"bb\"\n}\n"
        );
    }

    #[test]
    fn test_persist_empty_map() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");

        ChangeCache::empty(&path).persist().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        let mut cache = ChangeCache::empty(&path);
        cache.record("a.bnf", "1111");
        cache.persist().unwrap();

        let mut loaded = ChangeCache::load(&path).unwrap();
        assert_eq!(loaded.get("a.bnf"), Some("1111"));

        loaded.record("b.bnf", "2222");
        loaded.persist().unwrap();

        let reloaded = ChangeCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(!reloaded.should_process("a.bnf", "1111"));
        assert!(!reloaded.should_process("b.bnf", "2222"));
    }

    #[test]
    fn test_persist_overwrites_previous_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        fs::write(&path, "stale content that is much longer than the new one").unwrap();

        let mut cache = ChangeCache::empty(&path);
        cache.record("a.bnf", "x");
        cache.persist().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n    \"a.bnf\": \"x\"\n}\n"
        );
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let cache = ChangeCache::empty(tmp.path().join("missing/cache.json"));

        assert!(matches!(cache.persist(), Err(CacheError::Write { .. })));
    }
}
