//! Durable key-value substrate and the persisted store on top of it.
//!
//! Every collection lives under its own key as one JSON document. The
//! [`PersistedStore`] is best-effort: reads fall back to the caller's
//! default and writes log their failures instead of returning them.
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace, warn};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::{OrganizerError, Result};

/// A local key-value substrate holding serialized text.
pub trait Backend {
    /// Raw text stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn store(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Every key currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens (and creates if needed) the data directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            debug!("Data directory does not exist, creating: {}", root.display());
            fs::create_dir_all(&root).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                OrganizerError::DirectoryError { path: root.clone() }
            })?;
        }
        info!("Using data directory {}", root.display());
        Ok(Self { root })
    }

    /// Points at `root` without touching the filesystem. Every operation
    /// fails if the directory does not exist.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Helper method to get the file path for a key
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(OrganizerError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl Backend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            trace!("No file for key {}", key);
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            OrganizerError::Io(e)
        })?;
        Ok(Some(text))
    }

    // Write to a temporary file in the same directory, then rename over the
    // target so a crash never leaves a half-written document behind.
    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        debug!("Writing key {} to {}", key, path.display());

        let mut temp_file = NamedTempFile::new_in(&self.root).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            OrganizerError::Io(e)
        })?;

        temp_file.write_all(value.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            OrganizerError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            OrganizerError::Io(e)
        })?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            OrganizerError::Io(e.error)
        })?;

        trace!("Key {} persisted", key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            debug!("Removing {}", path.display());
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().is_file() && entry.path().extension().is_some_and(|ext| ext == "json")
            })
            .filter_map(|entry| {
                entry
                    .path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// In-process backend. Can be switched to "unavailable" to exercise the
/// store's fallback paths.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    available: bool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Raw text under `key`, bypassing availability.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Plants raw text under `key`, bypassing availability.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn check(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(OrganizerError::StorageUnavailable {
                message: "memory backend switched off".to_string(),
            })
        }
    }
}

impl Backend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.check()?;
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Typed, best-effort view over a [`Backend`].
#[derive(Debug, Clone)]
pub struct PersistedStore<B = FileBackend> {
    backend: B,
    pretty: bool,
}

impl<B: Backend> PersistedStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            pretty: false,
        }
    }

    /// Write documents as indented JSON.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Rehydrates the value under `key`.
    ///
    /// A missing key yields `default`, which is persisted straight away. An
    /// unreadable or corrupted entry also yields `default` but is left in
    /// place so its contents can still be recovered by hand.
    pub fn read<T>(&mut self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        match self.backend.load(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!("Rehydrated key {}", key);
                    value
                }
                Err(e) => {
                    warn!("Stored value for {} is corrupted, using default: {}", key, e);
                    default
                }
            },
            Ok(None) => {
                debug!("No stored value for {}, persisting default", key);
                self.write(key, &default);
                default
            }
            Err(e) => {
                warn!("Storage unavailable for {}, using default: {}", key, e);
                default
            }
        }
    }

    /// Serializes and persists `value`, reporting failure to the caller.
    pub fn try_write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        self.backend.store(key, &text)
    }

    /// Serializes and persists `value`. Failures are logged, never returned.
    pub fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.try_write(key, value) {
            error!("Failed to persist {}: {}", key, e);
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            warn!("Could not list stored keys: {}", e);
            Vec::new()
        })
    }
}
