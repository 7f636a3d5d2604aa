//! Route resolution and access gating for console navigation.
//!
//! A navigation request is resolved against the static [`RouteTable`], then
//! the matched entry and a snapshot of the session go through
//! [`gate::evaluate`]. Both steps are synchronous and free of shared state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::auth::AuthSnapshot;

pub mod gate;
pub mod history;
pub mod pattern;
pub mod table;

pub use gate::{GateDecision, evaluate};
pub use history::NavigationHistory;
pub use pattern::{PathPattern, PatternError, Segment};
pub use table::{
    DASHBOARD_PATH, LOGIN_PATH, Page, RedirectDirective, RouteEntry, RouteMatch, RouteTable,
    RouteTarget, TableError, Visibility,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches `{path}`")]
    NotFound { path: String },
    #[error("navigation to `{path}` exceeded {hops} redirects")]
    RedirectLoop { path: String, hops: usize },
}

/// NavigationRequest
///
/// A single navigation action: the requested path plus the session state
/// observed at the moment it is evaluated.
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    pub path: String,
    pub auth: AuthSnapshot,
}

impl NavigationRequest {
    pub fn new(path: impl Into<String>, auth: AuthSnapshot) -> Self {
        Self {
            path: path.into(),
            auth,
        }
    }
}

/// NavigationOutcome
///
/// Serializable result of [`navigate`], served by the headless decision API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export)]
pub enum NavigationOutcome {
    Render {
        page: Page,
        pattern: String,
        params: BTreeMap<String, String>,
    },
    Redirect {
        to: String,
        replace: bool,
    },
    NotFound {
        path: String,
    },
}

/// navigate
///
/// Resolves and gates one request. Unmatched paths come back as
/// [`NavigationOutcome::NotFound`]; what to show for them is the caller's call.
pub fn navigate(table: &RouteTable, request: &NavigationRequest) -> NavigationOutcome {
    let route = match table.resolve(&request.path) {
        Ok(route) => route,
        Err(_) => {
            tracing::warn!(path = %request.path, "No route matches navigation request");
            return NavigationOutcome::NotFound {
                path: request.path.clone(),
            };
        }
    };

    let decision = evaluate(&route, &request.auth);
    tracing::debug!(
        path = %request.path,
        pattern = %route.entry.pattern,
        authenticated = request.auth.is_authenticated(),
        ?decision,
        "Gate evaluated"
    );

    match decision {
        GateDecision::Render { page, params } => NavigationOutcome::Render {
            page,
            pattern: route.entry.pattern.to_string(),
            params,
        },
        GateDecision::Redirect(RedirectDirective { to, replace }) => {
            NavigationOutcome::Redirect { to, replace }
        }
    }
}
