//! Per-request context scopes.
//!
//! The console wraps its pages in three scopes, outermost first:
//! authentication, market selection, active market. Each step here consumes
//! the previous one, so a [`SessionContext`] can only be built in that order,
//! and a market always exists before the active market is derived from it.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    auth::{AuthSnapshot, AuthenticatorState},
    config::AppConfig,
};

/// Market used when nothing else selects one.
pub const DEFAULT_MARKET: &str = "LA";

/// MarketSelection
///
/// A normalized (trimmed, uppercase) market code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSelection(String);

impl MarketSelection {
    /// Normalizes `code`; blank input falls back to [`DEFAULT_MARKET`].
    pub fn new(code: &str) -> Self {
        Self::or_default(Some(code), DEFAULT_MARKET)
    }

    /// Picks `requested` when it is non-blank, otherwise `default`.
    pub fn or_default(requested: Option<&str>, default: &str) -> Self {
        let code = requested
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(default);
        Self(code.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MarketSelection {
    fn default() -> Self {
        Self(DEFAULT_MARKET.to_string())
    }
}

/// Outermost scope: the session snapshot.
#[derive(Debug, Clone)]
pub struct AuthScope {
    auth: AuthSnapshot,
}

impl AuthScope {
    pub fn new(auth: AuthSnapshot) -> Self {
        Self { auth }
    }

    pub fn auth(&self) -> &AuthSnapshot {
        &self.auth
    }

    pub fn with_market(self, market: MarketSelection) -> MarketScope {
        MarketScope {
            auth: self.auth,
            market,
        }
    }
}

/// Middle scope: session plus the selected market.
#[derive(Debug, Clone)]
pub struct MarketScope {
    auth: AuthSnapshot,
    market: MarketSelection,
}

impl MarketScope {
    pub fn market(&self) -> &MarketSelection {
        &self.market
    }

    /// Derives the active market from the selection and closes the bundle.
    pub fn activate(self) -> SessionContext {
        let active_market = self.market.clone();
        SessionContext {
            auth: self.auth,
            market: self.market,
            active_market,
        }
    }
}

/// SessionContext
///
/// The immutable bundle handed to page handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub auth: AuthSnapshot,
    pub market: MarketSelection,
    pub active_market: MarketSelection,
}

impl SessionContext {
    /// Shorthand for the full scope chain.
    pub fn build(auth: AuthSnapshot, market: MarketSelection) -> Self {
        AuthScope::new(auth).with_market(market).activate()
    }
}

/// SessionContext extractor
///
/// Runs the scopes in order for every request: auth snapshot first, then the
/// `x-market` header (or the configured default), then activation.
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
    AuthenticatorState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthSnapshot::from_request_parts(parts, state).await?;
        let config = AppConfig::from_ref(state);

        let requested = parts
            .headers
            .get("x-market")
            .and_then(|value| value.to_str().ok());
        let market = MarketSelection::or_default(requested, &config.default_market);

        Ok(AuthScope::new(auth).with_market(market).activate())
    }
}
