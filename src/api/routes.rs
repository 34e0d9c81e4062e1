//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, clear_team_handler, details_by_id_handler, details_by_name_handler,
    health_handler, list_handler, remove_member_handler, remove_prefix_handler, stats_handler,
    sweep_handler, team_handler, toggle_member_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /pokemon` - Species list (`?limit=&refresh=`)
/// - `GET /pokemon/name/:name` - Species details by name
/// - `GET /pokemon/id/:id` - Species details by id
/// - `GET /team`, `DELETE /team` - Show or clear the team
/// - `POST /team/toggle` - Add or remove a team member
/// - `DELETE /team/:id` - Remove a team member
/// - `GET /cache/stats` - Entry counts by state
/// - `POST /cache/sweep` - Delete expired entries
/// - `DELETE /cache` - Delete every cache entry
/// - `DELETE /cache/prefix/:prefix` - Delete entries under a sub-prefix
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/pokemon", get(list_handler))
        .route("/pokemon/name/:name", get(details_by_name_handler))
        .route("/pokemon/id/:id", get(details_by_id_handler))
        .route("/team", get(team_handler).delete(clear_team_handler))
        .route("/team/toggle", post(toggle_member_handler))
        .route("/team/:id", delete(remove_member_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/sweep", post(sweep_handler))
        .route("/cache/prefix/:prefix", delete(remove_prefix_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FetchError, Fetcher};
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    /// Fetcher whose upstream is always down.
    struct OfflineFetcher;

    #[async_trait]
    impl Fetcher for OfflineFetcher {
        async fn fetch_json(&self, _path: &str, _query: &[(&str, String)]) -> Result<Value, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    fn create_test_app() -> Router {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(OfflineFetcher),
            &Config::default(),
        );
        create_router(state)
    }

    async fn status_of(app: Router, method: &str, uri: &str, body: Body) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let status = status_of(create_test_app(), "GET", "/health", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let status = status_of(create_test_app(), "GET", "/cache/stats", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let status = status_of(create_test_app(), "GET", "/pokemon", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let status = status_of(create_test_app(), "GET", "/pokemon/id/abc", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_toggle_invalid_body() {
        let status = status_of(
            create_test_app(),
            "POST",
            "/team/toggle",
            Body::from(r#"{"id":0,"name":"x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
