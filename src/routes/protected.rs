use crate::{AppState, handlers, navigation::RouteTable};
use axum::{Router, routing::get};

/// Protected Router Module
///
/// Registers every protected entry of the route table. The caller must wrap
/// the result in the gate middleware: it is what sends anonymous visitors to
/// `/login` and forwards `/` to the dashboard before `render_page` runs.
pub fn protected_routes(table: &RouteTable) -> Router<AppState> {
    table
        .protected()
        .fold(Router::new(), |router, entry| {
            router.route(&entry.pattern.to_axum_path(), get(handlers::render_page))
        })
}
