//! Key/value persistence of floor plans, saved furniture and store layouts.
//!
//! Each collection is one JSON array stored under a fixed key. A store only
//! moves strings around; the repositories own the record layout.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use planokit_core::StorageError;
use planokit_designer::{
    FloorPlan, FurnitureItem, FurnitureLibrary, FurnitureProduct, SavedFurniture, StoreLayout,
};

/// Key of the floor-plan collection.
pub const FLOOR_PLANS_KEY: &str = "store-floor-plans";
/// Key holding the id of the active floor plan.
pub const ACTIVE_FLOOR_PLAN_KEY: &str = "active-floor-plan";
/// Key of the saved furniture collection.
pub const SAVED_FURNITURE_KEY: &str = "saved-furniture";
/// Key of the store layout collection.
pub const STORE_LAYOUTS_KEY: &str = "store-layouts";

type StorageResult<T> = Result<T, StorageError>;

/// String key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Volatile store, mostly for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens `dir`, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid storage key: {:?}", key),
            )
            .into());
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        // Write beside the target, then rename over it.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match std::fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

fn read_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> StorageResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Corrupted {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

fn write_json<T: Serialize + ?Sized>(store: &impl KeyValueStore, key: &str, value: &T) -> StorageResult<()> {
    store.set(key, &serde_json::to_string(value)?)
}

/// Floor plans stored as one array, plus the id of the active plan.
#[derive(Debug)]
pub struct FloorPlanRepository<S> {
    store: S,
}

impl<S: KeyValueStore> FloorPlanRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list(&self) -> StorageResult<Vec<FloorPlan>> {
        Ok(read_json(&self.store, FLOOR_PLANS_KEY)?.unwrap_or_default())
    }

    pub fn load(&self, id: &str) -> StorageResult<FloorPlan> {
        self.list()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StorageError::NotFound {
                collection: FLOOR_PLANS_KEY.to_string(),
                id: id.to_string(),
            })
    }

    /// Inserts or replaces `plan` and makes it active. A replaced plan keeps
    /// its original `createdAt`; `updatedAt` is set to now.
    pub fn save(&self, plan: &FloorPlan) -> StorageResult<FloorPlan> {
        let mut plans = self.list()?;
        let mut stored = plan.clone();
        stored.updated_at = Utc::now();
        match plans.iter_mut().find(|p| p.id == plan.id) {
            Some(existing) => {
                stored.created_at = existing.created_at;
                *existing = stored.clone();
            }
            None => plans.push(stored.clone()),
        }
        write_json(&self.store, FLOOR_PLANS_KEY, &plans)?;
        self.set_active(&stored.id)?;
        tracing::info!("Saved floor plan {} ({} elements)", stored.id, stored.elements.len());
        Ok(stored)
    }

    /// Deletes a plan. Returns `false` when there was none with that id.
    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        let mut plans = self.list()?;
        let before = plans.len();
        plans.retain(|p| p.id != id);
        if plans.len() == before {
            return Ok(false);
        }
        write_json(&self.store, FLOOR_PLANS_KEY, &plans)?;
        if self.active_id()?.as_deref() == Some(id) {
            self.store.remove(ACTIVE_FLOOR_PLAN_KEY)?;
        }
        tracing::info!("Deleted floor plan {}", id);
        Ok(true)
    }

    pub fn active_id(&self) -> StorageResult<Option<String>> {
        read_json(&self.store, ACTIVE_FLOOR_PLAN_KEY)
    }

    pub fn set_active(&self, id: &str) -> StorageResult<()> {
        write_json(&self.store, ACTIVE_FLOOR_PLAN_KEY, id)
    }

    /// The active plan, `None` when unset or pointing at a deleted plan.
    pub fn load_active(&self) -> StorageResult<Option<FloorPlan>> {
        let Some(id) = self.active_id()? else {
            return Ok(None);
        };
        match self.load(&id) {
            Ok(plan) => Ok(Some(plan)),
            Err(StorageError::NotFound { .. }) => {
                tracing::warn!("Active floor plan {} no longer exists", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Saved furniture templates and store layouts.
#[derive(Debug)]
pub struct FurnitureRepository<S> {
    store: S,
}

impl<S: KeyValueStore> FurnitureRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> StorageResult<Vec<SavedFurniture>> {
        Ok(read_json(&self.store, SAVED_FURNITURE_KEY)?.unwrap_or_default())
    }

    fn library(&self) -> StorageResult<FurnitureLibrary> {
        Ok(FurnitureLibrary::from_items(self.list()?))
    }

    fn write_library(&self, library: &FurnitureLibrary) -> StorageResult<()> {
        write_json(&self.store, SAVED_FURNITURE_KEY, library.items())
    }

    /// Adds a template, replacing one with the same id.
    pub fn add(&self, saved: SavedFurniture) -> StorageResult<SavedFurniture> {
        let mut library = self.library()?;
        let stored = library.add(saved).clone();
        self.write_library(&library)?;
        Ok(stored)
    }

    pub fn update(
        &self,
        id: &str,
        furniture: FurnitureItem,
        products: Vec<FurnitureProduct>,
        description: Option<String>,
    ) -> StorageResult<SavedFurniture> {
        let mut library = self.library()?;
        let stored = library
            .update(id, furniture, products, description)
            .map_err(|_| StorageError::NotFound {
                collection: SAVED_FURNITURE_KEY.to_string(),
                id: id.to_string(),
            })?
            .clone();
        self.write_library(&library)?;
        Ok(stored)
    }

    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        let mut library = self.library()?;
        if library.remove(id).is_none() {
            return Ok(false);
        }
        self.write_library(&library)?;
        Ok(true)
    }

    pub fn list_layouts(&self) -> StorageResult<Vec<StoreLayout>> {
        Ok(read_json(&self.store, STORE_LAYOUTS_KEY)?.unwrap_or_default())
    }

    /// Inserts or replaces a layout, keeping the original creation time.
    pub fn save_layout(&self, layout: &StoreLayout) -> StorageResult<StoreLayout> {
        let mut layouts = self.list_layouts()?;
        let mut stored = layout.clone();
        stored.updated_at = Utc::now().timestamp_millis();
        match layouts.iter_mut().find(|l| l.id == layout.id) {
            Some(existing) => {
                stored.created_at = existing.created_at;
                *existing = stored.clone();
            }
            None => layouts.push(stored.clone()),
        }
        write_json(&self.store, STORE_LAYOUTS_KEY, &layouts)?;
        Ok(stored)
    }

    pub fn delete_layout(&self, id: &str) -> StorageResult<bool> {
        let mut layouts = self.list_layouts()?;
        let before = layouts.len();
        layouts.retain(|l| l.id != id);
        if layouts.len() == before {
            return Ok(false);
        }
        write_json(&self.store, STORE_LAYOUTS_KEY, &layouts)?;
        Ok(true)
    }
}
