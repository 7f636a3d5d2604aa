use std::collections::BTreeMap;

use axum::{
    Extension, Json,
    extract::{OriginalUri, Path, Query, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    auth::AuthSnapshot,
    context::SessionContext,
    models::{NavigateQuery, PageView, RenderedRoute},
    navigation::{NavigationOutcome, NavigationRequest, navigate},
};

/// Set on redirects whose directive asks to replace the history entry.
pub const HISTORY_REPLACE_HEADER: &str = "x-history-replace";

/// navigate_decision
///
/// [Public Route] Headless form of the gate. Returns the decision for any
/// console path as JSON, without following it, so a client-side router can
/// act on it.
#[utoipa::path(
    get,
    path = "/api/navigate",
    params(NavigateQuery),
    responses((status = 200, description = "Gate decision", body = NavigationOutcome))
)]
pub async fn navigate_decision(
    State(state): State<AppState>,
    auth: AuthSnapshot,
    Query(query): Query<NavigateQuery>,
) -> Json<NavigationOutcome> {
    Json(navigate(
        &state.routes,
        &NavigationRequest::new(query.path, auth),
    ))
}

/// gate_middleware
///
/// Route layer in front of every console page. The session context is built
/// once here, judged by [`navigate`], and handed to the page through the
/// request extensions together with the [`RenderedRoute`]. A redirect
/// short-circuits with `303 See Other`.
///
/// Captured parameters come from axum's `Path`, so the page receives the
/// percent-decoded values, the same ones `/api/navigate` reports.
pub async fn gate_middleware(
    State(state): State<AppState>,
    Path(decoded): Path<BTreeMap<String, String>>,
    ctx: SessionContext,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    match navigate(
        &state.routes,
        &NavigationRequest::new(path, ctx.auth.clone()),
    ) {
        NavigationOutcome::Render { page, pattern, .. } => {
            request.extensions_mut().insert(RenderedRoute {
                page,
                pattern,
                params: decoded,
            });
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        NavigationOutcome::Redirect { to, replace } => redirect_response(&to, replace),
        outcome @ NavigationOutcome::NotFound { .. } => {
            (StatusCode::NOT_FOUND, Json(outcome)).into_response()
        }
    }
}

/// render_page
///
/// Builds the page descriptor for a route the gate has already cleared,
/// using the same session context the gate judged.
pub async fn render_page(
    Extension(route): Extension<RenderedRoute>,
    Extension(ctx): Extension<SessionContext>,
) -> Json<PageView> {
    Json(PageView {
        page: route.page,
        pattern: route.pattern,
        params: route.params,
        market: ctx.market.as_str().to_string(),
        active_market: ctx.active_market.as_str().to_string(),
        user_id: ctx.auth.user().map(|user| user.id),
    })
}

/// not_found
///
/// Fallback for paths outside the route table.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    tracing::warn!(path = %uri.path(), "No console route for path");
    (
        StatusCode::NOT_FOUND,
        Json(NavigationOutcome::NotFound {
            path: uri.path().to_string(),
        }),
    )
}

fn redirect_response(to: &str, replace: bool) -> Response {
    let mut response = Redirect::to(to).into_response();
    if replace {
        response.headers_mut().insert(
            HeaderName::from_static(HISTORY_REPLACE_HEADER),
            HeaderValue::from_static("true"),
        );
    }
    response
}
