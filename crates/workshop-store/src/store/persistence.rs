use super::backend::StorageBackend;
use super::fs_backend::FsBackend;
use super::obfuscation::Obfuscator;
use crate::config::PersistenceOptions;
use crate::error::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Upper bound on identifier draws before giving up.
pub const MAX_ID_ATTEMPTS: usize = 64;

/// Which on-disk variant of a collection an engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    Regular,
    Obfuscated,
}

impl StorageMode {
    pub fn suffix(&self) -> &'static str {
        match self {
            StorageMode::Regular => "Regular",
            StorageMode::Obfuscated => "Obfuscated",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Rewrite `dir/name.ext` to `dir/name_<Mode>.ext`.
///
/// Only the file name component is touched, so dots in directory names are
/// left alone. A name without extension gets the suffix appended.
pub fn suffixed_path(path: &Path, mode: StorageMode) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };
    let mut name = stem.to_os_string();
    name.push("_");
    name.push(mode.suffix());
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Serializes whole collections to text, optionally obfuscated, through a
/// [`StorageBackend`].
///
/// Collections are written in full on every save; there are no incremental
/// writes. The engine never decides what a failure means for the caller:
/// every operation returns a [`Result`], and [`PersistenceEngine::load_or`]
/// is the explicit opt-in to "log and fall back to a default".
pub struct PersistenceEngine<B: StorageBackend = FsBackend> {
    backend: B,
    options: PersistenceOptions,
    obfuscator: Obfuscator,
}

impl PersistenceEngine<FsBackend> {
    pub fn new(options: PersistenceOptions) -> Self {
        Self::with_backend(FsBackend::new(), options)
    }
}

impl<B: StorageBackend> PersistenceEngine<B> {
    pub fn with_backend(backend: B, options: PersistenceOptions) -> Self {
        Self {
            backend,
            options,
            obfuscator: Obfuscator::new(options.obfuscation_key),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> PersistenceOptions {
        self.options
    }

    pub fn mode(&self) -> StorageMode {
        if self.options.obfuscate {
            StorageMode::Obfuscated
        } else {
            StorageMode::Regular
        }
    }

    /// The path actually read and written for a configured `path`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        suffixed_path(path, self.mode())
    }

    /// Serialize `collection` into the text that [`PersistenceEngine::save`] writes.
    pub fn encode<C: Serialize + ?Sized>(&self, collection: &C) -> Result<String> {
        let json = serde_json::to_string_pretty(collection).map_err(StoreError::Serialization)?;
        if self.options.obfuscate {
            Ok(self.obfuscator.obfuscate(&json))
        } else {
            Ok(json)
        }
    }

    /// Inverse of [`PersistenceEngine::encode`].
    pub fn decode<C: DeserializeOwned>(&self, text: &str) -> Result<C> {
        if self.options.obfuscate {
            let json = self.obfuscator.deobfuscate(text)?;
            serde_json::from_str(&json).map_err(StoreError::Serialization)
        } else {
            serde_json::from_str(text).map_err(StoreError::Serialization)
        }
    }

    /// Write the whole `collection` to the mode-suffixed variant of `path`,
    /// creating parent directories as needed.
    pub fn save<C: Serialize + ?Sized>(&self, collection: &C, path: &Path) -> Result<()> {
        let target = self.resolve_path(path);
        let result = self
            .encode(collection)
            .and_then(|text| self.backend.write_text(&target, &text).map(|_| text.len()));

        match result {
            Ok(bytes) => {
                debug!(path = %target.display(), mode = %self.mode(), bytes, "saved collection");
                Ok(())
            }
            Err(e) => {
                error!(
                    path = %target.display(),
                    mode = %self.mode(),
                    error = %e,
                    "failed to save collection"
                );
                Err(e)
            }
        }
    }

    /// Read and decode the collection stored for `path`.
    ///
    /// Returns `Ok(None)` when nothing is stored yet or the stored text is
    /// blank; malformed content is an error.
    pub fn load<C: DeserializeOwned>(&self, path: &Path) -> Result<Option<C>> {
        let target = self.resolve_path(path);
        let Some(text) = self.backend.read_text(&target)? else {
            debug!(path = %target.display(), "no stored collection");
            return Ok(None);
        };
        if text.trim().is_empty() {
            debug!(path = %target.display(), "stored collection is empty");
            return Ok(None);
        }

        let collection = self.decode(&text)?;
        debug!(
            path = %target.display(),
            mode = %self.mode(),
            bytes = text.len(),
            "loaded collection"
        );
        Ok(Some(collection))
    }

    /// [`PersistenceEngine::load`], logging any failure and returning `default` instead.
    pub fn load_or<C: DeserializeOwned>(&self, path: &Path, default: C) -> C {
        match self.load(path) {
            Ok(Some(collection)) => collection,
            Ok(None) => default,
            Err(e) => {
                warn!(
                    path = %self.resolve_path(path).display(),
                    error = %e,
                    "could not load collection, using default"
                );
                default
            }
        }
    }
}

/// Draw random identifiers until one is not taken.
///
/// `is_taken` reports whether a candidate is already in use. Collisions in a
/// 128-bit space are practically impossible, so the first draw almost always
/// wins; the loop is still capped at [`MAX_ID_ATTEMPTS`].
pub fn generate_unique_id<F>(is_taken: F) -> Result<Uuid>
where
    F: Fn(&Uuid) -> bool,
{
    generate_unique_id_with(is_taken, Uuid::new_v4)
}

/// [`generate_unique_id`] with an explicit candidate source.
pub fn generate_unique_id_with<F, G>(is_taken: F, mut next: G) -> Result<Uuid>
where
    F: Fn(&Uuid) -> bool,
    G: FnMut() -> Uuid,
{
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = next();
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(StoreError::IdGeneration {
        attempts: MAX_ID_ATTEMPTS,
    })
}
