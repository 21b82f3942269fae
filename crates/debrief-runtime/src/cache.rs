//! Response cache for model calls.
//!
//! Entries live on disk as `<dir>/<sha256-hex>.txt` holding the raw
//! generated text, with no metadata and no expiry. A moka cache fronts the
//! directory so repeated prompts in one process skip the filesystem.
//!
//! Writes go to a temporary file in the cache directory that is then renamed
//! over the entry, so readers never observe a partial body.

use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default number of entries kept in memory.
pub const DEFAULT_MEMORY_ENTRIES: u64 = 1_000;

/// Cache key: SHA-256 hex of `model + "\n" + prompt`.
pub fn cache_key(model: &str, prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update(b"\n");
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Disk-backed cache of generated text.
pub struct ResponseCache {
    dir: PathBuf,
    memory: Cache<String, String>,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_memory_capacity(dir, DEFAULT_MEMORY_ENTRIES)
    }

    pub fn with_memory_capacity(dir: impl Into<PathBuf>, max_entries: u64) -> Self {
        Self {
            dir: dir.into(),
            memory: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", key))
    }

    /// Look up an entry. Any read failure is treated as a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(text) = self.memory.get(key).await {
            return Some(text);
        }

        let path = self.entry_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                self.memory.insert(key.to_string(), text.clone()).await;
                Some(text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable cache entry, treating as miss");
                None
            }
        }
    }

    /// Store an entry, replacing any existing one atomically.
    pub async fn put(&self, key: &str, text: &str) -> io::Result<()> {
        let dir = self.dir.clone();
        let path = self.entry_path(key);
        let body = text.to_string();

        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, body.as_bytes()))
            .await
            .map_err(io::Error::other)??;

        self.memory.insert(key.to_string(), text.to_string()).await;
        Ok(())
    }

    /// Drop the in-memory front. Disk entries are kept.
    pub fn clear_memory(&self) {
        self.memory.invalidate_all();
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("dir", &self.dir)
            .field("memory_entries", &self.memory.entry_count())
            .finish()
    }
}

fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
