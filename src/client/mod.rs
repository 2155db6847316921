//! Typed HTTP client for the CRUD REST endpoint
//!
//! Mirrors the endpoint's contract from the caller's side. Filter, sort and
//! range encode through the same codecs the server decodes with, so the two
//! sides form one protocol version. Non-2xx responses surface as
//! [`CrudClientError::Http`] carrying the status code and the
//! server-supplied message verbatim; callers can branch on
//! `"404: No such entity with ID 5"` versus `"404: Malformed ID: x"`.

use crate::core::entity::CrudEntity;
use crate::core::error::ErrorResponse;
use crate::core::filter::Filter;
use crate::core::query::{FetchRange, SortClause, encode_sort};
use std::marker::PhantomData;

/// Failures raised by [`CrudClient`]
#[derive(Debug, thiserror::Error)]
pub enum CrudClientError {
    /// The server answered with a non-2xx status. The message is the
    /// server's text, unaltered.
    #[error("{status}: {message}")]
    Http { status: u16, message: String },

    /// The request never completed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Client for one entity collection exposed by a CRUD endpoint.
///
/// `base_url` points at the collection root, e.g.
/// `http://localhost:8080/rest/people`; a trailing slash is optional.
pub struct CrudClient<T> {
    base_url: String,
    http: reqwest::Client,
    _entity: PhantomData<fn() -> T>,
}

impl<T: CrudEntity> CrudClient<T> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        CrudClient {
            base_url,
            http,
            _entity: PhantomData,
        }
    }

    /// Fetch the slice of the filtered, sorted collection selected by
    /// `range`. [`FetchRange::ALL`] leaves the range to the server, which
    /// caps the result at its configured maximum.
    pub async fn get_all(
        &self,
        filter: Option<&Filter>,
        sort_by: &[SortClause],
        range: FetchRange,
    ) -> Result<Vec<T>, CrudClientError> {
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some((offset, limit)) = range.to_offset_limit() {
            params.push(("offset".to_string(), offset.to_string()));
            params.push(("limit".to_string(), limit.to_string()));
        }
        params.extend(encode_sort(sort_by));
        if let Some(filter) = filter {
            params.extend(filter.to_query_pairs());
        }
        tracing::debug!(url = %self.base_url, params = params.len(), "getAll");
        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| CrudClientError::Decode(e.to_string()))
    }

    /// Cardinality of the filtered collection
    pub async fn get_count(&self, filter: Option<&Filter>) -> Result<u64, CrudClientError> {
        let params = filter.map(Filter::to_query_pairs).unwrap_or_default();
        let response = self
            .http
            .get(format!("{}count", self.base_url))
            .query(&params)
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        body.trim()
            .parse()
            .map_err(|_| CrudClientError::Decode(format!("not a count: {body}")))
    }

    /// Fetch one entity by its id rendered as a path segment
    pub async fn get_one(&self, id: &str) -> Result<T, CrudClientError> {
        let response = self
            .http
            .get(format!("{}{id}", self.base_url))
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| CrudClientError::Decode(e.to_string()))
    }

    /// Create an entity; the server assigns the id and returns the stored
    /// value
    pub async fn create(&self, entity: &T) -> Result<T, CrudClientError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(entity)
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| CrudClientError::Decode(e.to_string()))
    }

    /// Replace the entity under `id`
    pub async fn update(&self, id: &str, entity: &T) -> Result<T, CrudClientError> {
        let response = self
            .http
            .put(format!("{}{id}", self.base_url))
            .json(entity)
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| CrudClientError::Decode(e.to_string()))
    }

    /// Delete the entity under `id`; succeeds for absent ids
    pub async fn delete(&self, id: &str) -> Result<(), CrudClientError> {
        let response = self
            .http
            .delete(format!("{}{id}", self.base_url))
            .send()
            .await?;
        Self::success_body(response).await?;
        Ok(())
    }

    /// Return the body of a successful response, or the typed HTTP failure.
    ///
    /// Error bodies are the endpoint's JSON `{code, message}` shape; the
    /// message travels through unchanged. A non-JSON error body is passed
    /// along as-is.
    async fn success_body(response: reqwest::Response) -> Result<String, CrudClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(CrudClientError::Http {
            status: status.as_u16(),
            message,
        })
    }
}
