//! Builder assembling CRUD collections into a servable router

use crate::config::CrudConfig;
use crate::core::auth::CrudAuthorizer;
use crate::core::entity::CrudEntity;
use crate::core::loader::CrudAccess;
use crate::server::rest::{CrudState, crud_routes};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds an axum router exposing one or more entity collections under a
/// common path prefix.
///
/// ```rust,ignore
/// let app = CrudRouterBuilder::new("/rest")
///     .register::<Person>(store.clone())
///     .build();
/// // GET /rest/people, GET /rest/people/count, ...
/// ```
pub struct CrudRouterBuilder {
    prefix: String,
    router: Router,
}

impl CrudRouterBuilder {
    /// Create a builder; `prefix` may be `"/"` to mount at the root
    pub fn new(prefix: impl Into<String>) -> Self {
        CrudRouterBuilder {
            prefix: prefix.into(),
            router: Router::new(),
        }
    }

    /// Register a collection at `/{prefix}/{resource_name}` with default
    /// configuration and no access control
    pub fn register<T: CrudEntity>(self, access: Arc<dyn CrudAccess<T>>) -> Self {
        self.register_with(CrudState::new(access))
    }

    /// Register a collection with explicit configuration and authorizer
    pub fn register_configured<T: CrudEntity>(
        self,
        access: Arc<dyn CrudAccess<T>>,
        config: Arc<CrudConfig>,
        authorizer: Arc<dyn CrudAuthorizer>,
    ) -> Self {
        self.register_with(
            CrudState::new(access)
                .with_config(config)
                .with_authorizer(authorizer),
        )
    }

    fn register_with<T: CrudEntity>(mut self, state: CrudState<T>) -> Self {
        let path = format!("/{}", T::resource_name());
        tracing::debug!(collection = T::resource_name(), "registering CRUD routes");
        self.router = self.router.nest(&path, crud_routes(state));
        self
    }

    /// Finish the router, wrapped in a request trace layer
    pub fn build(self) -> Router {
        let app = if self.prefix.is_empty() || self.prefix == "/" {
            self.router
        } else {
            Router::new().nest(&self.prefix, self.router)
        };
        app.layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until the task is cancelled
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Install a `tracing` subscriber reading the `RUST_LOG` environment filter.
///
/// Call once at startup; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
