//! Crash-safe TOML files.
//!
//! Writes go to a hidden sibling temp file, are fsynced, then renamed over
//! the target. Read-modify-write cycles hold an exclusive `fs2` lock on a
//! sibling `.lock` file so two client processes cannot interleave.

use fs2::FileExt;
use reverie_core::{ReverieError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Typed handle to a TOML file.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file.
    ///
    /// A missing or whitespace-only file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Replaces the file contents atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        let parent = self.parent_dir()?;
        fs::create_dir_all(parent)?;

        let serialized = toml::to_string_pretty(data)?;
        let tmp_path = self.temp_path()?;
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(serialized.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Locked read-modify-write.
    ///
    /// `default_value` is used when the file does not exist yet. The updated
    /// value is written only if `apply` succeeds.
    pub fn update<F>(&self, default_value: T, apply: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = self.load()?.unwrap_or(default_value);
        apply(&mut data)?;
        self.save(&data)
    }

    fn parent_dir(&self) -> Result<&Path> {
        self.path
            .parent()
            .ok_or_else(|| ReverieError::io(format!("{} has no parent directory", self.path.display())))
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| ReverieError::io(format!("{} has no file name", self.path.display())))?;
        Ok(self
            .parent_dir()?
            .join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock released (and its file removed) on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()
            .map_err(|e| ReverieError::io(format!("Failed to lock {}: {}", lock_path.display(), e)))?;

        Ok(Self { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.lock_path);
    }
}
