//! Local persistent key-value storage.
//!
//! The task store only needs "read the bytes under a key" and "replace the
//! bytes under a key". Values are raw bytes so data that is not valid UTF-8
//! can still be read back and copied aside. `FileStore` keeps one file per key inside the data
//! directory and replaces it atomically (temp file in the same directory, then
//! rename), so a crash mid-write never leaves a half-written file behind.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tempfile::NamedTempFile;
use tracing::debug;

/// Key under which the task list is stored.
pub const TASKS_KEY: &str = "tasks";

/// Durable byte storage addressed by key.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> anyhow::Result<()>;
}

/// File-backed store: `<dir>/<key>.json`.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    #[tracing::instrument(skip(dir))]
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        debug!(dir = %dir.display(), "opened file store");
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(data) => {
                debug!(file = %path.display(), bytes = data.len(), "read key");
                Ok(Some(data))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed reading {}", path.display())),
        }
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&mut self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        let path = self.path_for(key);
        debug!(file = %path.display(), bytes = value.len(), "writing key atomically");

        let mut temp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("failed to create temp file in {}", self.dir.display()))?;
        temp.write_all(value)?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
