//! Grid-facing data provision
//!
//! Grids page with a zero-based offset and a row limit and expect sizes as
//! `usize`; the data-access layer speaks inclusive `u64` ranges. The
//! adapter in this module translates between the two so any
//! [`DataLoader`] can back a grid unchanged.

use crate::core::filter::Filter;
use crate::core::loader::{DataLoader, ListDataLoader};
use crate::core::query::{FetchRange, SortClause};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Column sort direction as grids express it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One column's sort choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSortOrder {
    pub property: String,
    pub direction: SortDirection,
}

impl GridSortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        GridSortOrder {
            property: property.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        GridSortOrder {
            property: property.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn to_sort_clause(&self) -> SortClause {
        match self.direction {
            SortDirection::Ascending => SortClause::asc(&self.property),
            SortDirection::Descending => SortClause::desc(&self.property),
        }
    }
}

/// A grid's page request
#[derive(Debug, Clone, Default)]
pub struct GridQuery {
    pub offset: usize,
    pub limit: usize,
    pub sort_orders: Vec<GridSortOrder>,
    pub filter: Option<Filter>,
}

/// What a grid needs from its backing data
#[async_trait]
pub trait GridDataProvider<T>: Send + Sync {
    /// Row count under the query's filter, saturated to `usize`
    async fn size(&self, query: &GridQuery) -> Result<usize>;

    /// The rows of one page
    async fn fetch(&self, query: &GridQuery) -> Result<Vec<T>>;

    /// Stable identity of a row, for selection tracking across refreshes
    fn item_id(&self, item: &T) -> String;
}

/// Adapts a [`DataLoader`] to the [`GridDataProvider`] contract.
///
/// Counts larger than the platform's `usize` saturate; fetch errors pass
/// through to the grid unchanged.
pub struct DataLoaderAdapter<T> {
    loader: Arc<dyn DataLoader<T>>,
    id_resolver: Box<dyn Fn(&T) -> String + Send + Sync>,
}

impl<T: Send + Sync + 'static> DataLoaderAdapter<T> {
    pub fn new(
        loader: Arc<dyn DataLoader<T>>,
        id_resolver: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        DataLoaderAdapter {
            loader,
            id_resolver: Box::new(id_resolver),
        }
    }

    /// Back a grid directly from an in-memory item list
    pub fn from_items(
        items: Vec<T>,
        id_resolver: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self
    where
        T: crate::core::entity::CrudEntity,
    {
        Self::new(Arc::new(ListDataLoader::new(items)), id_resolver)
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> GridDataProvider<T> for DataLoaderAdapter<T> {
    async fn size(&self, query: &GridQuery) -> Result<usize> {
        let count = self.loader.get_count(query.filter.as_ref()).await?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }

    async fn fetch(&self, query: &GridQuery) -> Result<Vec<T>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        let start = query.offset as u64;
        let end_inclusive = start
            .saturating_add(query.limit as u64)
            .saturating_sub(1);
        let sort_by: Vec<SortClause> = query
            .sort_orders
            .iter()
            .map(GridSortOrder::to_sort_clause)
            .collect();
        self.loader
            .fetch(
                query.filter.as_ref(),
                &sort_by,
                FetchRange::new(start, end_inclusive),
            )
            .await
    }

    fn item_id(&self, item: &T) -> String {
        (self.id_resolver)(item)
    }
}
