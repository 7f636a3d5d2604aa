use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core navigation services and per-request context.
pub mod auth;
pub mod config;
pub mod context;
pub mod handlers;
pub mod models;
pub mod navigation;

// Console pages split by visibility (public, protected).
pub mod routes;
use routes::{protected, public};

// --- Public Re-exports ---

// Makes the state building blocks reachable from main.rs and the tests.
pub use auth::{AuthSnapshot, AuthenticatorState, JwtAuthenticator};
pub use config::AppConfig;
pub use context::SessionContext;
pub use navigation::{NavigationOutcome, RouteTable};

/// ApiDoc
///
/// OpenAPI document for the service endpoints, served at
/// `/api-docs/openapi.json`. Console pages are generated from the route
/// table and described by the `PageView` schema.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::navigate_decision),
    components(
        schemas(
            models::PageView,
            navigation::NavigationOutcome,
            navigation::Page,
            navigation::Visibility,
            navigation::RedirectDirective,
        )
    ),
    tags(
        (name = "market-console-gate", description = "Market console navigation gate")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single, immutable container shared by every request. Handlers and
/// extractors pull the pieces they need through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    /// Console route table: built once at startup, never mutated.
    pub routes: Arc<RouteTable>,
    /// Session check behind `Authorization: Bearer`. JWT in production,
    /// swappable for tests.
    pub authenticator: AuthenticatorState,
    /// The loaded environment configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Wires the console table and a JWT authenticator from `config`.
    pub fn new(config: AppConfig, routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(routes),
            authenticator: Arc::new(JwtAuthenticator::new(&config.jwt_secret)),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Lets the `AuthSnapshot` and `SessionContext` extractors reach their
// dependencies without depending on `AppState` itself.

impl FromRef<AppState> for AuthenticatorState {
    fn from_ref(app_state: &AppState) -> AuthenticatorState {
        app_state.authenticator.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the page routes from the route table, puts the gate in front of
/// them, and adds the observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // The gate runs as a route layer, after routing, so it sees the matched
    // path parameters.
    let gate = || middleware::from_fn_with_state(state.clone(), handlers::gate_middleware);

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI for the headless navigation API.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Service endpoints: health check and /api/navigate. No gate.
        .merge(public::service_routes())
        // Public pages: the gate always renders them, but it is still what
        // resolves the route and attaches it to the request.
        .merge(public::public_routes(&state.routes).route_layer(gate()))
        // Protected pages: anonymous sessions are redirected to /login.
        .merge(protected::protected_routes(&state.routes).route_layer(gate()))
        // Anything outside the route table.
        .fallback(handlers::not_found)
        .with_state(state.clone());

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, tagged with its ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echoes x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Span for each request, carrying the `x-request-id` so every log line of a
/// request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
