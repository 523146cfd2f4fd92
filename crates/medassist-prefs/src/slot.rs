use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::PreferenceError;

/// A durable, process-local key-value slot.
///
/// `read` returns `Ok(None)` when nothing has been written under `key` yet.
pub trait PreferenceSlot: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError>;

    /// Overwrites any previous value under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PreferenceError>;
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<platform config dir>/com.medassist.app`
    pub fn default_location() -> Result<Self, PreferenceError> {
        let base = dirs::config_dir().ok_or_else(|| {
            PreferenceError::PersistenceUnavailable("no config directory found".to_string())
        })?;
        Ok(Self::new(base.join("com.medassist.app")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PreferenceSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), "preference slot read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable(&path, e)),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PreferenceError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| unavailable(&self.dir, e))?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, bytes).map_err(|e| unavailable(&tmp_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| unavailable(&tmp_path, e))?;
        }

        std::fs::rename(&tmp_path, &path).map_err(|e| unavailable(&path, e))?;
        Ok(())
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> PreferenceError {
    PreferenceError::PersistenceUnavailable(format!("{}: {err}", path.display()))
}

/// In-memory slot for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    reject_writes: AtomicBool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing `reject_writes`.
    pub fn with_entry(self, key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes.into());
        self
    }

    /// Make subsequent writes fail, as a full or read-only medium would.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn contents(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl PreferenceSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError> {
        Ok(self.contents(key))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PreferenceError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(PreferenceError::PersistenceUnavailable(
                "quota exceeded".to_string(),
            ));
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
