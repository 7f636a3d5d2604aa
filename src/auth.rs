use std::{convert::Infallible, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AppConfig, Env};

/// Claims
///
/// Payload expected inside the session JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's UUID.
    pub sub: Uuid,
    /// Expiration Time (exp), validated on every request.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity behind an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// AuthSnapshot
///
/// Session state captured once per navigation. The gate takes this as an
/// explicit argument and never looks at ambient auth state. Authentication
/// is derived from the presence of a user, so the two cannot disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    user: Option<AuthUser>,
}

impl AuthSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: AuthUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }
}

/// Authenticator
///
/// Contract for turning a bearer token into an identity. The JWT
/// implementation is used in every environment; tests plug in their own.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the user the token belongs to, or `None` when it is invalid,
    /// expired, or revoked.
    async fn authenticate(&self, token: &str) -> Option<AuthUser>;
}

pub type AuthenticatorState = Arc<dyn Authenticator>;

/// JwtAuthenticator
///
/// Validates HS256 tokens signed with the shared session secret.
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, token: &str) -> Option<AuthUser> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(AuthUser {
                id: data.claims.sub,
            }),
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::warn!("Rejected expired session token"),
                    kind => tracing::warn!(?kind, "Rejected invalid session token"),
                }
                None
            }
        }
    }
}

/// AuthSnapshot extractor
///
/// Never rejects. Missing or bad credentials yield an anonymous snapshot and
/// the gate decides what that means for the requested route.
///
/// 1. Local bypass: in `Env::Local`, a UUID in `x-user-id` is accepted as-is.
/// 2. Bearer token: `Authorization: Bearer <jwt>` checked by the configured
///    [`Authenticator`].
impl<S> FromRequestParts<S> for AuthSnapshot
where
    S: Send + Sync,
    AuthenticatorState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = AuthenticatorState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let bypass = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|id| Uuid::parse_str(id).ok());
            if let Some(id) = bypass {
                return Ok(AuthSnapshot::authenticated(AuthUser { id }));
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Ok(AuthSnapshot::anonymous());
        };

        Ok(match authenticator.authenticate(token).await {
            Some(user) => AuthSnapshot::authenticated(user),
            None => AuthSnapshot::anonymous(),
        })
    }
}
