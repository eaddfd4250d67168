//! Persistent key-value store holding the pipeline collections
//!
//! Every collection is a JSON array stored under a fixed key. A missing key
//! reads as an empty collection. Writers replace a whole collection at once.

mod file;
mod memory;

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};
use shared::User;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the signed-in user is kept
pub const USER_KEY: &str = "user";

/// Backend holding raw JSON strings by key
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// The persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Materials,
    Plans,
    SurgeBunkerProcesses,
    PptReadings,
    FinishedGoods,
    FuelConsumption,
    CostRecords,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Materials,
        Collection::Plans,
        Collection::SurgeBunkerProcesses,
        Collection::PptReadings,
        Collection::FinishedGoods,
        Collection::FuelConsumption,
        Collection::CostRecords,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Collection::Materials => "materials",
            Collection::Plans => "plans",
            Collection::SurgeBunkerProcesses => "surgeBunkerProcesses",
            Collection::PptReadings => "pptReadings",
            Collection::FinishedGoods => "finishedGoods",
            Collection::FuelConsumption => "fuelConsumption",
            Collection::CostRecords => "costRecords",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Shared handle to the store, cloned into every service
///
/// Mutations go through [`Store::update`] or [`Store::write`], which hold a
/// single write lock for the whole read-modify-write so that codes derived
/// from collection lengths are never handed out twice by one process.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Store {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Volatile store, used by tests and the `memory` backend
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// File-backed store rooted at `data_dir`
    pub fn open(data_dir: impl Into<std::path::PathBuf>) -> AppResult<Self> {
        Ok(Self::new(FileStore::open(data_dir)?))
    }

    /// Read a whole collection
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> AppResult<Vec<T>> {
        read_collection(self.backend.as_ref(), collection)
    }

    /// Overwrite a whole collection
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> AppResult<()> {
        let _guard = self.lock()?;
        write_collection(self.backend.as_ref(), collection, records)
    }

    /// Read-modify-write one collection under the write lock
    ///
    /// Nothing is written when `apply` fails.
    pub fn update<T, R, F>(&self, collection: Collection, apply: F) -> AppResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let writer = self.write()?;
        let mut records = writer.load(collection)?;
        let result = apply(&mut records)?;
        writer.save(collection, &records)?;
        Ok(result)
    }

    /// Take the write lock for an operation spanning several collections
    pub fn write(&self) -> AppResult<StoreWriter<'_>> {
        Ok(StoreWriter {
            backend: self.backend.as_ref(),
            _guard: self.lock()?,
        })
    }

    pub fn load_user(&self) -> AppResult<Option<User>> {
        match self.backend.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_user(&self, user: &User) -> AppResult<()> {
        let raw = serde_json::to_string(user)?;
        self.backend.set(USER_KEY, &raw)
    }

    pub fn clear_user(&self) -> AppResult<()> {
        self.backend.remove(USER_KEY)
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::StorageError("store write lock poisoned".to_string()))
    }
}

/// Exclusive writer over all collections
pub struct StoreWriter<'a> {
    backend: &'a dyn KeyValueStore,
    _guard: MutexGuard<'a, ()>,
}

impl StoreWriter<'_> {
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> AppResult<Vec<T>> {
        read_collection(self.backend, collection)
    }

    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> AppResult<()> {
        write_collection(self.backend, collection, records)
    }
}

fn read_collection<T: DeserializeOwned>(
    backend: &dyn KeyValueStore,
    collection: Collection,
) -> AppResult<Vec<T>> {
    match backend.get(collection.key())? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

fn write_collection<T: Serialize>(
    backend: &dyn KeyValueStore,
    collection: Collection,
    records: &[T],
) -> AppResult<()> {
    let raw = serde_json::to_string(records)?;
    backend.set(collection.key(), &raw)?;
    tracing::debug!(collection = %collection, records = records.len(), "collection written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collection_reads_empty() {
        let store = Store::in_memory();
        let plans: Vec<serde_json::Value> = store.load(Collection::Plans).unwrap();
        assert!(plans.is_empty());
    }

    #[test]
    fn failed_update_writes_nothing() {
        let store = Store::in_memory();
        store.save(Collection::Materials, &[1, 2, 3]).unwrap();

        let result: AppResult<()> = store.update(Collection::Materials, |records: &mut Vec<i32>| {
            records.clear();
            Err(AppError::validation("materials", "rejected"))
        });

        assert!(result.is_err());
        let records: Vec<i32> = store.load(Collection::Materials).unwrap();
        assert_eq!(records, vec![1, 2, 3]);
    }

    #[test]
    fn collection_keys_are_fixed() {
        let keys: Vec<&str> = Collection::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                "materials",
                "plans",
                "surgeBunkerProcesses",
                "pptReadings",
                "finishedGoods",
                "fuelConsumption",
                "costRecords"
            ]
        );
    }
}
