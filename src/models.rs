use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::navigation::Page;

/// PageView
///
/// What a rendered console page receives: which component, the pattern it
/// matched, captured path parameters, and the market scopes it runs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    pub page: Page,
    pub pattern: String,
    pub params: BTreeMap<String, String>,
    pub market: String,
    pub active_market: String,
    // Absent on public pages visited anonymously.
    pub user_id: Option<Uuid>,
}

/// RenderedRoute
///
/// Left in the request extensions by the gate once a route is cleared to
/// render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRoute {
    pub page: Page,
    pub pattern: String,
    pub params: BTreeMap<String, String>,
}

/// NavigateQuery
///
/// Query parameters for the headless decision endpoint (GET /api/navigate).
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NavigateQuery {
    /// Console path to evaluate, e.g. `/leads/42`.
    pub path: String,
}
