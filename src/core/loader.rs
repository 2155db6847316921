//! Data-access traits consumed by the CRUD endpoint and the grid adapter

use crate::core::entity::CrudEntity;
use crate::core::filter::Filter;
use crate::core::query::{FetchRange, SortClause, compare_by};
use anyhow::Result;
use async_trait::async_trait;

/// A paged, filtered, sorted data source.
///
/// Identical `(filter, sort_by, range)` arguments against an unchanged
/// backing collection must yield identical results; implementations with no
/// natural order must fall back to a stable one when `sort_by` is empty.
#[async_trait]
pub trait DataLoader<T>: Send + Sync {
    /// Cardinality of the filtered (unsorted, unranged) result set
    async fn get_count(&self, filter: Option<&Filter>) -> Result<u64>;

    /// The slice of the ordered, filtered result set selected by `range`
    async fn fetch(
        &self,
        filter: Option<&Filter>,
        sort_by: &[SortClause],
        range: FetchRange,
    ) -> Result<Vec<T>>;
}

/// Full data-access contract behind a CRUD endpoint.
#[async_trait]
pub trait CrudAccess<T: CrudEntity>: DataLoader<T> {
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>>;

    /// Persist a new entity. The store assigns the identifier; any
    /// identifier already on the value is discarded.
    async fn create(&self, entity: T) -> Result<T>;

    /// Replace the entity under `id`. Returns `None` when no such entity
    /// exists; the stored value always carries the given id.
    async fn update(&self, id: &T::Id, entity: T) -> Result<Option<T>>;

    /// Delete the entity under `id`. Idempotent: deleting an absent id is
    /// not an error.
    async fn delete(&self, id: &T::Id) -> Result<()>;
}

/// Read-only [`DataLoader`] over an in-memory list, in insertion order.
///
/// Doubles as the oracle in protocol tests: fetching is exactly filter,
/// then sort, then slice.
pub struct ListDataLoader<T> {
    items: Vec<T>,
}

impl<T: CrudEntity> ListDataLoader<T> {
    pub fn new(items: Vec<T>) -> Self {
        ListDataLoader { items }
    }
}

#[async_trait]
impl<T: CrudEntity> DataLoader<T> for ListDataLoader<T> {
    async fn get_count(&self, filter: Option<&Filter>) -> Result<u64> {
        let count = self
            .items
            .iter()
            .filter(|item| filter.is_none_or(|f| f.matches(*item)))
            .count();
        Ok(count as u64)
    }

    async fn fetch(
        &self,
        filter: Option<&Filter>,
        sort_by: &[SortClause],
        range: FetchRange,
    ) -> Result<Vec<T>> {
        let mut items: Vec<T> = self
            .items
            .iter()
            .filter(|item| filter.is_none_or(|f| f.matches(*item)))
            .cloned()
            .collect();
        if !sort_by.is_empty() {
            items.sort_by(|a, b| compare_by(sort_by, a, b));
        }
        Ok(range.slice(items))
    }
}
