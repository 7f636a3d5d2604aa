use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{
    NavigationError,
    pattern::{PathPattern, PatternError, split_path},
};

/// Page
///
/// The console's page components. Their internals live in the frontend; the
/// gate only needs to name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Page {
    Login,
    Register,
    Inbox,
    Dashboard,
    Leads,
    LeadDetail,
    Parcels,
    Outreach,
    Buyers,
    BuyerDetail,
    Comps,
    Ingestion,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Visibility {
    Public,
    Protected,
}

/// RedirectDirective
///
/// Instruction for the navigation mechanism to move elsewhere. `replace`
/// means the current history entry is overwritten instead of pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RedirectDirective {
    pub to: String,
    pub replace: bool,
}

impl RedirectDirective {
    pub fn replace(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: true,
        }
    }

    pub fn push(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: false,
        }
    }
}

/// What a route produces once the gate lets it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Page(Page),
    Redirect(RedirectDirective),
}

/// RouteEntry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: PathPattern,
    pub target: RouteTarget,
    pub visibility: Visibility,
}

impl RouteEntry {
    pub fn page(pattern: &str, page: Page, visibility: Visibility) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            target: RouteTarget::Page(page),
            visibility,
        })
    }

    pub fn redirect(
        pattern: &str,
        directive: RedirectDirective,
        visibility: Visibility,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            target: RouteTarget::Redirect(directive),
            visibility,
        })
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// RouteMatch
///
/// A table entry bound to a concrete path, with its captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub entry: RouteEntry,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("route `{first}` is ambiguous with `{second}`")]
    Ambiguous { first: String, second: String },
}

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Landing page the root path forwards to.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// RouteTable
///
/// Ordered, immutable set of route entries. Construction rejects tables in
/// which two entries could match the same path with equal specificity, so
/// every concrete path resolves to at most one entry.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, TableError> {
        for (i, first) in entries.iter().enumerate() {
            if let Some(second) = entries[i + 1..]
                .iter()
                .find(|other| first.pattern.overlaps(&other.pattern))
            {
                return Err(TableError::Ambiguous {
                    first: first.pattern.to_string(),
                    second: second.pattern.to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// console
    ///
    /// The market console's route table: two public pages, the protected
    /// pages, and the root forwarding to the dashboard.
    pub fn console() -> Result<Self, TableError> {
        use Page::*;
        use Visibility::*;

        Self::new(vec![
            RouteEntry::page(LOGIN_PATH, Login, Public)?,
            RouteEntry::page("/register", Register, Public)?,
            RouteEntry::redirect("/", RedirectDirective::replace(DASHBOARD_PATH), Protected)?,
            RouteEntry::page("/inbox", Inbox, Protected)?,
            RouteEntry::page(DASHBOARD_PATH, Dashboard, Protected)?,
            RouteEntry::page("/leads", Leads, Protected)?,
            RouteEntry::page("/leads/:id", LeadDetail, Protected)?,
            RouteEntry::page("/parcels", Parcels, Protected)?,
            RouteEntry::page("/outreach", Outreach, Protected)?,
            RouteEntry::page("/buyers", Buyers, Protected)?,
            RouteEntry::page("/buyers/:id", BuyerDetail, Protected)?,
            RouteEntry::page("/comps", Comps, Protected)?,
            RouteEntry::page("/ingestion", Ingestion, Protected)?,
            RouteEntry::page("/settings", Settings, Protected)?,
        ])
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn public(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter().filter(|e| e.is_public())
    }

    pub fn protected(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter().filter(|e| !e.is_public())
    }

    /// resolve
    ///
    /// Finds the entry for a concrete path. When several patterns match, the
    /// most specific one (static segments before parameters) wins.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, NavigationError> {
        let not_found = || NavigationError::NotFound {
            path: path.to_string(),
        };
        let parts = split_path(path).ok_or_else(not_found)?;

        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .pattern
                    .match_segments(&parts)
                    .map(|params| (entry, params))
            })
            .max_by(|(a, _), (b, _)| a.pattern.compare_specificity(&b.pattern))
            .map(|(entry, params)| RouteMatch {
                entry: entry.clone(),
                params,
            })
            .ok_or_else(not_found)
    }
}
