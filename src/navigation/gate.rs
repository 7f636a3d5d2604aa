use std::collections::BTreeMap;

use crate::auth::AuthSnapshot;

use super::table::{LOGIN_PATH, Page, RedirectDirective, RouteMatch, RouteTarget, Visibility};

/// GateDecision
///
/// Result of running a resolved route through the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render {
        page: Page,
        params: BTreeMap<String, String>,
    },
    Redirect(RedirectDirective),
}

/// evaluate
///
/// Decides render vs redirect for a resolved route, given an explicit
/// snapshot of the session. Pure: the same inputs always give the same output.
///
/// - Public entries always render.
/// - Redirect entries (the root) always forward, whatever the session state.
/// - Protected pages render only for an authenticated session; anyone else is
///   sent to `/login`, replacing the history entry.
pub fn evaluate(route: &RouteMatch, auth: &AuthSnapshot) -> GateDecision {
    let entry = &route.entry;

    match (&entry.target, entry.visibility) {
        (RouteTarget::Redirect(directive), _) => GateDecision::Redirect(directive.clone()),
        (RouteTarget::Page(page), Visibility::Public) => GateDecision::Render {
            page: *page,
            params: route.params.clone(),
        },
        (RouteTarget::Page(page), Visibility::Protected) if auth.is_authenticated() => {
            GateDecision::Render {
                page: *page,
                params: route.params.clone(),
            }
        }
        (RouteTarget::Page(_), Visibility::Protected) => {
            GateDecision::Redirect(RedirectDirective::replace(LOGIN_PATH))
        }
    }
}
