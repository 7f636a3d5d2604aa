use crate::{AppState, handlers, navigation::RouteTable};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Registers every public entry of the route table, plus the health check
/// and the headless navigation API. The gate always lets public pages
/// render, so no session is required here.
pub fn public_routes(table: &RouteTable) -> Router<AppState> {
    table
        .public()
        .fold(Router::new(), |router, entry| {
            router.route(&entry.pattern.to_axum_path(), get(handlers::render_page))
        })
}

/// Service endpoints that sit outside the console route table.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /api/navigate?path=...
        // Returns the gate decision for a path as JSON.
        .route("/api/navigate", get(handlers::navigate_decision))
}
