//! HTTP routes for /graphql
//!
//! POST executes GraphQL; GET serves the GraphiQL playground to browsers.
//! The bearer token is decoded once per request and attached as request
//! data. A bad token is not an error here, resolvers reject anonymous calls.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;

use crate::app::AppState;

use super::auth::resolve_identity;

/// Router with /graphql. Merge into the app and call `.with_state(state)`.
pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", get(graphiql).post(graphql_handler))
}

async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    let header = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    match resolve_identity(header, &state.config.app_secret) {
        Some(user) => request = request.data(user),
        None => tracing::debug!("No identity on request"),
    }

    state.schema.execute(request).await.into()
}
