//! In-memory implementation of the CRUD data-access traits for testing and
//! development

use crate::core::entity::CrudEntity;
use crate::core::filter::Filter;
use crate::core::loader::{CrudAccess, DataLoader};
use crate::core::query::{FetchRange, SortClause, compare_by};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// Produces fresh identifiers for newly created entities
pub trait IdGenerator<Id>: Send + Sync {
    fn next_id(&self) -> Id;
}

/// Monotonically increasing `i64` identifiers
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    pub fn starting_at(first: i64) -> Self {
        SequentialIds {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator<i64> for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// In-memory CRUD store. Uses RwLock for thread-safe access.
///
/// When no sort is requested, results come back in ascending id order,
/// which is the store's stable order. Filtering and sorting reuse the same
/// in-memory evaluation the protocol tests are phrased against.
#[derive(Clone)]
pub struct InMemoryCrudStore<T: CrudEntity> {
    entries: Arc<RwLock<HashMap<T::Id, T>>>,
    ids: Arc<dyn IdGenerator<T::Id>>,
}

impl<T: CrudEntity> InMemoryCrudStore<T> {
    pub fn new(ids: Arc<dyn IdGenerator<T::Id>>) -> Self {
        InMemoryCrudStore {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ids,
        }
    }

    fn filtered(&self, filter: Option<&Filter>) -> Result<Vec<T>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(entries
            .values()
            .filter(|item| filter.is_none_or(|f| f.matches(*item)))
            .cloned()
            .collect())
    }
}

impl<T> InMemoryCrudStore<T>
where
    T: CrudEntity<Id = i64>,
{
    /// A store assigning sequential `i64` identifiers starting at 1
    pub fn with_sequential_ids() -> Self {
        Self::new(Arc::new(SequentialIds::default()))
    }
}

#[async_trait]
impl<T: CrudEntity> DataLoader<T> for InMemoryCrudStore<T> {
    async fn get_count(&self, filter: Option<&Filter>) -> Result<u64> {
        Ok(self.filtered(filter)?.len() as u64)
    }

    async fn fetch(
        &self,
        filter: Option<&Filter>,
        sort_by: &[SortClause],
        range: FetchRange,
    ) -> Result<Vec<T>> {
        let mut items = self.filtered(filter)?;
        if sort_by.is_empty() {
            items.sort_by(|a, b| a.id().cmp(&b.id()));
        } else {
            items.sort_by(|a, b| compare_by(sort_by, a, b));
        }
        Ok(range.slice(items))
    }
}

#[async_trait]
impl<T: CrudEntity> CrudAccess<T> for InMemoryCrudStore<T> {
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(entries.get(id).cloned())
    }

    async fn create(&self, mut entity: T) -> Result<T> {
        let id = self.ids.next_id();
        entity.set_id(Some(id.clone()));
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        entries.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &T::Id, mut entity: T) -> Result<Option<T>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        if !entries.contains_key(id) {
            return Ok(None);
        }
        entity.set_id(Some(id.clone()));
        entries.insert(id.clone(), entity.clone());
        Ok(Some(entity))
    }

    async fn delete(&self, id: &T::Id) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        entries.remove(id);
        Ok(())
    }
}
