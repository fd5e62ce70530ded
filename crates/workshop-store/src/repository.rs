//! # Repository
//!
//! A typed façade over one entity collection: an in-memory map from
//! identifier to entity, mirrored in full to one backing file after every
//! mutation.
//!
//! ## Source of Truth
//!
//! The file is read once, when the repository is opened. From then on reads
//! are served from memory and every successful `register`, `update` or
//! `delete` rewrites the whole file, so reloading it reconstructs the map.
//! When a save fails, the in-memory change is rolled back before the error is
//! returned, keeping memory and disk in step.
//!
//! ## Identity
//!
//! Identifiers are generated here, never by callers. `register` overwrites
//! whatever id the entity carried; `update` locates the stored entity by the
//! replacement's own id.
//!
//! ## What Is Not Enforced
//!
//! Field uniqueness (e.g. one employee per email) belongs to the calling
//! domain module, which should query before registering.

use crate::config::StoreConfig;
use crate::entity::Entity;
use crate::error::Result;
use crate::search::fuzzy;
use crate::store::backend::StorageBackend;
use crate::store::fs_backend::FsBackend;
use crate::store::persistence::{generate_unique_id, PersistenceEngine};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// The contract domain modules program against.
pub trait EntityStore<T> {
    /// Assign a fresh identifier, store the entity and persist. Returns the id.
    fn register(&mut self, entity: T) -> Result<Uuid>;

    /// Look up an entity by id. Served from memory.
    fn get_by_id(&self, id: &Uuid) -> Option<&T>;

    /// Replace the stored entity carrying `replacement`'s id.
    /// Returns `Ok(false)` without writing when that id is unknown.
    fn update(&mut self, replacement: T) -> Result<bool>;

    /// Remove and return the entity, persisting afterwards.
    /// Returns `Ok(None)` without writing when the id is unknown.
    fn delete_by_id(&mut self, id: &Uuid) -> Result<Option<T>>;

    /// Snapshot of all entities, in map iteration order.
    fn find_all(&self) -> Vec<&T>;

    fn find_where<P>(&self, predicate: P) -> Vec<&T>
    where
        P: Fn(&T) -> bool;

    fn find_first_where<P>(&self, predicate: P) -> Option<&T>
    where
        P: Fn(&T) -> bool;

    /// Fuzzy search over the string `extractor` pulls from each entity,
    /// best match first.
    fn search_by_pattern<F>(&self, pattern: &str, extractor: F) -> Vec<&T>
    where
        F: Fn(&T) -> String + Sync;

    /// Whether the backing file held any entities when the store was opened.
    fn has_any_loaded(&self) -> bool;
}

pub struct Repository<T, B: StorageBackend = FsBackend> {
    engine: PersistenceEngine<B>,
    path: PathBuf,
    entities: HashMap<Uuid, T>,
    loaded_any: bool,
    min_similarity: f64,
}

impl<T> Repository<T, FsBackend>
where
    T: Entity + Serialize + DeserializeOwned,
{
    /// Open `file_name` under the configured data directory, with the
    /// configured obfuscation mode and search threshold.
    pub fn from_config(config: &StoreConfig, file_name: &str) -> Result<Self> {
        let engine = PersistenceEngine::new(config.persistence_options());
        let repo = Self::open(engine, config.path_for(file_name))?;
        Ok(repo.with_min_similarity(config.min_similarity))
    }
}

impl<T, B> Repository<T, B>
where
    T: Entity + Serialize + DeserializeOwned,
    B: StorageBackend,
{
    /// Load the collection stored for `path`, or start empty if there is none.
    ///
    /// Unreadable or malformed files are errors; see [`Repository::open_lenient`].
    pub fn open(engine: PersistenceEngine<B>, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entities: HashMap<Uuid, T> = engine.load(&path)?.unwrap_or_default();
        debug!(
            path = %engine.resolve_path(&path).display(),
            count = entities.len(),
            "opened repository"
        );
        Ok(Self::from_parts(engine, path, entities))
    }

    /// Like [`Repository::open`], but a file that cannot be read or parsed is
    /// logged and treated as empty.
    ///
    /// The next successful mutation overwrites that file.
    pub fn open_lenient(engine: PersistenceEngine<B>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entities = match engine.load::<HashMap<Uuid, T>>(&path) {
            Ok(loaded) => loaded.unwrap_or_default(),
            Err(e) => {
                warn!(
                    path = %engine.resolve_path(&path).display(),
                    error = %e,
                    "could not load repository, starting empty"
                );
                HashMap::new()
            }
        };
        Self::from_parts(engine, path, entities)
    }

    fn from_parts(engine: PersistenceEngine<B>, path: PathBuf, entities: HashMap<Uuid, T>) -> Self {
        Self {
            engine,
            path,
            loaded_any: !entities.is_empty(),
            entities,
            min_similarity: crate::config::DEFAULT_MIN_SIMILARITY,
        }
    }

    /// Threshold used by [`EntityStore::search_by_pattern`].
    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    /// The configured path, before mode suffixing.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn engine(&self) -> &PersistenceEngine<B> {
        &self.engine
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.values()
    }

    /// Mutable access for in-place edits. Changes reach disk only through
    /// [`Repository::save_current_entities`] or the next mutation.
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut T> {
        self.entities.get_mut(id)
    }

    /// Persist the current in-memory collection as is.
    pub fn save_current_entities(&self) -> Result<()> {
        self.engine.save(&self.entities, &self.path)
    }

    /// [`EntityStore::search_by_pattern`] with an explicit threshold.
    pub fn search_by_pattern_with_threshold<F>(
        &self,
        pattern: &str,
        min_similarity: f64,
        extractor: F,
    ) -> Vec<&T>
    where
        T: Sync,
        F: Fn(&T) -> String + Sync,
    {
        let items: Vec<&T> = self.entities.values().collect();
        fuzzy::find_similar_items(items, pattern, min_similarity, extractor)
    }
}

impl<T, B> EntityStore<T> for Repository<T, B>
where
    T: Entity + Serialize + DeserializeOwned + Sync,
    B: StorageBackend,
{
    fn register(&mut self, mut entity: T) -> Result<Uuid> {
        let id = generate_unique_id(|candidate| self.entities.contains_key(candidate))?;
        entity.assign_id(id);
        self.entities.insert(id, entity);

        if let Err(e) = self.save_current_entities() {
            self.entities.remove(&id);
            return Err(e);
        }
        debug!(%id, count = self.entities.len(), "registered entity");
        Ok(id)
    }

    fn get_by_id(&self, id: &Uuid) -> Option<&T> {
        self.entities.get(id)
    }

    fn update(&mut self, replacement: T) -> Result<bool> {
        let id = replacement.id();
        let Some(slot) = self.entities.get_mut(&id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(slot, replacement);

        if let Err(e) = self.save_current_entities() {
            self.entities.insert(id, previous);
            return Err(e);
        }
        debug!(%id, "updated entity");
        Ok(true)
    }

    fn delete_by_id(&mut self, id: &Uuid) -> Result<Option<T>> {
        let Some(removed) = self.entities.remove(id) else {
            return Ok(None);
        };

        if let Err(e) = self.save_current_entities() {
            self.entities.insert(*id, removed);
            return Err(e);
        }
        debug!(%id, count = self.entities.len(), "deleted entity");
        Ok(Some(removed))
    }

    fn find_all(&self) -> Vec<&T> {
        self.entities.values().collect()
    }

    fn find_where<P>(&self, predicate: P) -> Vec<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.entities.values().filter(|&e| predicate(e)).collect()
    }

    fn find_first_where<P>(&self, predicate: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.entities.values().find(|&e| predicate(e))
    }

    fn search_by_pattern<F>(&self, pattern: &str, extractor: F) -> Vec<&T>
    where
        F: Fn(&T) -> String + Sync,
    {
        self.search_by_pattern_with_threshold(pattern, self.min_similarity, extractor)
    }

    fn has_any_loaded(&self) -> bool {
        self.loaded_any
    }
}
