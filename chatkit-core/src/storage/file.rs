//! File-backed key-value store.
//!
//! Each key is stored as `<key>.json` inside one directory. Writes follow
//! the write-to-temp-then-rename pattern so a reader sees either the old or
//! the new value, never a partial one.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::error::{StorageError, StorageResult};
use super::traits::KeyValueStore;

fn io_error(context: impl AsRef<str>, err: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {err}", context.as_ref()))
}

/// [`KeyValueStore`] keeping one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `directory`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(directory: P) -> StorageResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|e| {
            io_error(
                format!("failed to create store directory '{}'", directory.display()),
                &e,
            )
        })?;
        Ok(Self { directory })
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn value_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.directory.join(format!("{key}.json")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!(".{key}.json.tmp"))
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        File::open(&self.directory)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| io_error("failed to sync store directory", &e))
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn sync_directory(&self) -> StorageResult<()> {
        // Directories cannot be opened for syncing here; rename is still atomic.
        Ok(())
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: String) -> StorageResult<Option<String>> {
        let path = self.value_path(&key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(format!("failed to read '{}'", path.display()), &e)),
        }
    }

    fn set(&self, key: String, value: String) -> StorageResult<()> {
        let final_path = self.value_path(&key)?;
        let temp_path = self.temp_path(&key);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| {
                io_error(format!("failed to create '{}'", temp_path.display()), &e)
            })?;
        file.write_all(value.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| io_error(format!("failed to write '{}'", temp_path.display()), &e))?;
        drop(file);

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            io_error(
                format!(
                    "failed to rename '{}' to '{}'",
                    temp_path.display(),
                    final_path.display()
                ),
                &e,
            )
        })?;

        self.sync_directory()
    }

    fn delete(&self, key: String) -> StorageResult<()> {
        let path = self.value_path(&key)?;
        match fs::remove_file(&path) {
            Ok(()) => self.sync_directory(),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(format!("failed to delete '{}'", path.display()), &e)),
        }
    }
}
