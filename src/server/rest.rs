//! REST exposure of a CRUD entity collection
//!
//! Builds the axum routes for one collection and translates HTTP query
//! parameters into the filter/sort/range primitives of the data-access
//! layer. The query-parameter shape is one protocol with the CRUD client;
//! both sides share the codecs in [`crate::core`].

use crate::config::CrudConfig;
use crate::core::auth::{CrudAuthorizer, CrudOp};
use crate::core::entity::CrudEntity;
use crate::core::error::CrudError;
use crate::core::filter::Filter;
use crate::core::loader::CrudAccess;
use crate::core::query::{FetchRange, SortClause, decode_sort};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use validator::Validate;

/// Shared state for one collection's handlers
pub struct CrudState<T: CrudEntity> {
    pub access: Arc<dyn CrudAccess<T>>,
    pub config: Arc<CrudConfig>,
    pub authorizer: Arc<dyn CrudAuthorizer>,
}

impl<T: CrudEntity> Clone for CrudState<T> {
    fn clone(&self) -> Self {
        CrudState {
            access: self.access.clone(),
            config: self.config.clone(),
            authorizer: self.authorizer.clone(),
        }
    }
}

impl<T: CrudEntity> CrudState<T> {
    pub fn new(access: Arc<dyn CrudAccess<T>>) -> Self {
        CrudState {
            access,
            config: Arc::new(CrudConfig::default()),
            authorizer: Arc::new(crate::core::auth::AllowAll),
        }
    }

    pub fn with_config(mut self, config: Arc<CrudConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn CrudAuthorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }
}

/// Build the routes for one entity collection.
///
/// ```text
/// GET    /            list (filter, sort_by, offset/limit)
/// GET    /count       filtered cardinality, bare integer body
/// GET    /{id}        one entity
/// POST   /            create, server assigns the id
/// PUT    /{id}        full replace, path id wins
/// PATCH  /{id}        same as PUT
/// DELETE /{id}        idempotent delete
/// ```
pub fn crud_routes<T: CrudEntity>(state: CrudState<T>) -> Router {
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/count", get(count::<T>))
        .route(
            "/{id}",
            get(get_one::<T>)
                .put(update::<T>)
                .patch(update::<T>)
                .delete(delete_one::<T>),
        )
        .with_state(state)
}

/// The list query, decoded from raw query pairs
#[derive(Debug)]
struct ListQuery {
    filter: Option<Filter>,
    sort_by: Vec<SortClause>,
    range: FetchRange,
}

fn parse_list_query(
    pairs: &[(String, String)],
    config: &CrudConfig,
) -> Result<ListQuery, CrudError> {
    let mut offset: u64 = 0;
    let mut limit: Option<u64> = None;
    for (name, value) in pairs {
        match name.as_str() {
            "offset" => {
                offset = value.parse().map_err(|_| CrudError::InvalidParam {
                    name: "offset".to_string(),
                    message: format!("not a non-negative integer: {value}"),
                })?;
            }
            "limit" => {
                let parsed: u64 = value.parse().map_err(|_| CrudError::InvalidParam {
                    name: "limit".to_string(),
                    message: format!("not a non-negative integer: {value}"),
                })?;
                if parsed == 0 || parsed > config.max_limit {
                    return Err(CrudError::InvalidParam {
                        name: "limit".to_string(),
                        message: format!("must be 1..{}", config.max_limit),
                    });
                }
                limit = Some(parsed);
            }
            _ => {}
        }
    }
    let sort_by = decode_sort(
        pairs
            .iter()
            .filter(|(name, _)| name == "sort_by")
            .map(|(_, value)| value.as_str()),
    );
    let filter = Filter::from_query_pairs(
        pairs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    let limit = limit.unwrap_or(config.max_limit);
    Ok(ListQuery {
        filter,
        sort_by,
        range: FetchRange::from_offset_limit(offset, limit),
    })
}

async fn list<T: CrudEntity>(
    State(state): State<CrudState<T>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<T>>, CrudError> {
    state.authorizer.authorize(CrudOp::List)?;
    let query = parse_list_query(&pairs, &state.config)?;
    tracing::debug!(
        collection = T::resource_name(),
        sort_keys = query.sort_by.len(),
        filtered = query.filter.is_some(),
        "list"
    );
    let items = state
        .access
        .fetch(query.filter.as_ref(), &query.sort_by, query.range)
        .await?;
    Ok(Json(items))
}

async fn count<T: CrudEntity>(
    State(state): State<CrudState<T>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, CrudError> {
    state.authorizer.authorize(CrudOp::Count)?;
    let filter = Filter::from_query_pairs(
        pairs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    let count = state.access.get_count(filter.as_ref()).await?;
    Ok(count.to_string())
}

async fn get_one<T: CrudEntity>(
    State(state): State<CrudState<T>>,
    Path(raw_id): Path<String>,
) -> Result<Json<T>, CrudError> {
    state.authorizer.authorize(CrudOp::GetOne)?;
    let id = T::parse_id(&raw_id)?;
    let entity = state
        .access
        .find_by_id(&id)
        .await?
        .ok_or(CrudError::NotFound { id: raw_id })?;
    Ok(Json(entity))
}

async fn create<T: CrudEntity>(
    State(state): State<CrudState<T>>,
    Json(mut entity): Json<T>,
) -> Result<Json<T>, CrudError> {
    state.authorizer.authorize(CrudOp::Create)?;
    entity.validate()?;
    // the store assigns the identifier; a client-supplied one is ignored
    entity.set_id(None);
    let stored = state.access.create(entity).await?;
    tracing::debug!(collection = T::resource_name(), "created entity");
    Ok(Json(stored))
}

async fn update<T: CrudEntity>(
    State(state): State<CrudState<T>>,
    Path(raw_id): Path<String>,
    Json(mut entity): Json<T>,
) -> Result<Json<T>, CrudError> {
    state.authorizer.authorize(CrudOp::Update)?;
    let id = T::parse_id(&raw_id)?;
    entity.validate()?;
    // the path id wins over whatever the body carries
    entity.set_id(Some(id.clone()));
    let updated = state
        .access
        .update(&id, entity)
        .await?
        .ok_or(CrudError::NotFound { id: raw_id })?;
    Ok(Json(updated))
}

async fn delete_one<T: CrudEntity>(
    State(state): State<CrudState<T>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, CrudError> {
    state.authorizer.authorize(CrudOp::Delete)?;
    let id = T::parse_id(&raw_id)?;
    // idempotent: deleting an absent id succeeds silently
    state.access.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
