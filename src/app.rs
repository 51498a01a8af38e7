//! Application state and HTTP router construction.
//!
//! Used by `main` and by the router tests to build the Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{Database, LinkStore};
use crate::graphql::{LinkFeedSchema, build_schema, service};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: LinkFeedSchema,
}

impl AppState {
    /// State backed by the SQLite link repository
    pub fn new(config: Config, db: Database) -> Self {
        let store: Arc<dyn LinkStore> = Arc::new(db.links());
        Self::with_store(config, db, store)
    }

    /// State with a custom link store behind the schema
    pub fn with_store(config: Config, db: Database, store: Arc<dyn LinkStore>) -> Self {
        Self {
            config: Arc::new(config),
            db,
            schema: build_schema(store),
        }
    }
}

/// Build the full Axum router: health routes, /graphql and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(crate::api::health::router())
        .merge(service::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
