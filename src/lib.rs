//! crudkit exposes typed entity collections over a REST CRUD protocol.
//!
//! The crate has three legs standing on one core:
//!
//! - [`server`] mounts axum routes for any [`core::CrudEntity`], speaking a
//!   query-parameter protocol for filtering, sorting and paging.
//! - [`client`] drives such an endpoint from the other side, encoding with
//!   the same codecs the server decodes with.
//! - [`security`] gates view navigation by role and [`ui`] feeds grids from
//!   any data loader.
//!
//! ```rust,ignore
//! use crudkit::prelude::*;
//!
//! impl_crud_entity!(Person, "people", id: i64, {
//!     #[validate(length(min = 1))]
//!     name: String,
//!     age: Option<i64>,
//! });
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     init_tracing();
//!     let store = Arc::new(InMemoryCrudStore::<Person>::with_sequential_ids());
//!     CrudRouterBuilder::new("/rest")
//!         .register::<Person>(store)
//!         .serve("0.0.0.0:8080")
//!         .await
//! }
//! ```

pub mod core;

pub mod client;
pub mod config;
pub mod security;
pub mod server;
pub mod storage;
pub mod ui;

/// One-stop imports for applications built on the toolkit
pub mod prelude {
    pub use crate::impl_crud_entity;

    pub use crate::core::{
        AllowAll, CrudAccess, CrudAuthorizer, CrudEntity, CrudError, CrudOp, DataLoader,
        ErrorResponse, FetchRange, FieldValue, Filter, FixedUserResolver, ListDataLoader,
        LoggedInUserResolver, NoUserResolver, Principal, RoleBasedAuthorizer, SortClause,
        compare_by, decode_sort, encode_sort,
    };

    pub use crate::client::{CrudClient, CrudClientError};
    pub use crate::config::CrudConfig;
    pub use crate::security::{AccessRule, NavigationOutcome, RouteRegistry, ViewAccessChecker, ViewRoute};
    pub use crate::server::{CrudRouterBuilder, CrudState, crud_routes, init_tracing};
    pub use crate::storage::{IdGenerator, InMemoryCrudStore, SequentialIds};
    pub use crate::ui::{
        DataLoaderAdapter, GridDataProvider, GridQuery, GridSortOrder, SortDirection,
    };

    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
    pub use validator::Validate;
}
