use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, Uri, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use market_console_gate::{
    AppState, RouteTable,
    auth::{AuthSnapshot, AuthUser, Authenticator, Claims, JwtAuthenticator},
    config::{AppConfig, Env},
};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Mock Authenticator ---

/// Accepts exactly one token and resolves it to a fixed user.
struct MockAuthenticator {
    token: &'static str,
    user: AuthUser,
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, token: &str) -> Option<AuthUser> {
        (token == self.token).then(|| self.user.clone())
    }
}

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn create_token(user_id: Uuid, secret: &str, iat: u64, exp: u64) -> String {
    let claims = Claims {
        sub: user_id,
        iat: iat as usize,
        exp: exp as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn valid_token() -> String {
    create_token(TEST_USER_ID, TEST_JWT_SECRET, now(), now() + 3600)
}

fn create_app_state(env: Env) -> AppState {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    };
    AppState::new(config, RouteTable::console().unwrap())
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}

// --- JwtAuthenticator ---

#[tokio::test]
async fn test_jwt_authenticator_accepts_valid_token() {
    let authenticator = JwtAuthenticator::new(TEST_JWT_SECRET);

    let user = authenticator.authenticate(&valid_token()).await;

    assert_eq!(user, Some(AuthUser { id: TEST_USER_ID }));
}

#[tokio::test]
async fn test_jwt_authenticator_rejects_expired_token() {
    let authenticator = JwtAuthenticator::new(TEST_JWT_SECRET);
    // Well past the default 60s leeway.
    let token = create_token(TEST_USER_ID, TEST_JWT_SECRET, now() - 7200, now() - 3600);

    assert_eq!(authenticator.authenticate(&token).await, None);
}

#[tokio::test]
async fn test_jwt_authenticator_rejects_foreign_signature() {
    let authenticator = JwtAuthenticator::new(TEST_JWT_SECRET);
    let token = create_token(TEST_USER_ID, "some-other-secret", now(), now() + 3600);

    assert_eq!(authenticator.authenticate(&token).await, None);
    assert_eq!(authenticator.authenticate("not-a-jwt").await, None);
}

// --- AuthSnapshot ---

#[test]
fn test_snapshot_state_follows_user() {
    let anonymous = AuthSnapshot::anonymous();
    assert!(!anonymous.is_authenticated());
    assert_eq!(anonymous.user(), None);
    assert_eq!(anonymous, AuthSnapshot::default());

    let user = AuthUser { id: TEST_USER_ID };
    let signed_in = AuthSnapshot::authenticated(user.clone());
    assert!(signed_in.is_authenticated());
    assert_eq!(signed_in.user(), Some(&user));
}

// --- AuthSnapshot extractor ---

#[tokio::test]
async fn test_snapshot_authenticated_with_valid_jwt() {
    let app_state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::GET, "/dashboard".parse().unwrap());
    with_bearer(&mut parts, &valid_token());

    let snapshot = AuthSnapshot::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.user(), Some(&AuthUser { id: TEST_USER_ID }));
}

#[tokio::test]
async fn test_snapshot_anonymous_with_missing_header() {
    let app_state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::GET, "/dashboard".parse().unwrap());

    let snapshot = AuthSnapshot::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert_eq!(snapshot, AuthSnapshot::anonymous());
}

#[tokio::test]
async fn test_snapshot_anonymous_without_bearer_prefix() {
    let app_state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::GET, "/dashboard".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&valid_token()).unwrap(),
    );

    let snapshot = AuthSnapshot::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert!(!snapshot.is_authenticated());
}

#[tokio::test]
async fn test_snapshot_uses_configured_authenticator() {
    let user = AuthUser { id: Uuid::new_v4() };
    let mut app_state = create_app_state(Env::Production);
    app_state.authenticator = Arc::new(MockAuthenticator {
        token: "opaque-session",
        user: user.clone(),
    });

    let mut parts = get_request_parts(Method::GET, "/inbox".parse().unwrap());
    with_bearer(&mut parts, "opaque-session");
    let snapshot = AuthSnapshot::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(snapshot, AuthSnapshot::authenticated(user));

    let mut parts = get_request_parts(Method::GET, "/inbox".parse().unwrap());
    with_bearer(&mut parts, "stale-session");
    let snapshot = AuthSnapshot::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert!(!snapshot.is_authenticated());
}

#[tokio::test]
async fn test_local_bypass_success() {
    let app_state = create_app_state(Env::Local);
    let mock_user_id = Uuid::new_v4();

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let snapshot = AuthSnapshot::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.user().map(|u| u.id), Some(mock_user_id));
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let app_state = create_app_state(Env::Production);
    let mock_user_id = Uuid::new_v4();

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let snapshot = AuthSnapshot::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert_eq!(snapshot, AuthSnapshot::anonymous());
}
