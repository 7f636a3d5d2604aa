use std::env;

use crate::context::DEFAULT_MARKET;

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Immutable configuration loaded once at startup and shared through
/// `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment. Controls the local auth bypass and log format.
    pub env: Env,
    // Secret used to validate session JWTs.
    pub jwt_secret: String,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Market selected when a request does not name one.
    pub default_market: String,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Test configuration that needs no environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            default_market: DEFAULT_MARKET.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads configuration from the environment.
    ///
    /// # Panics
    /// Panics in production when `JWT_SECRET` is not set, so the service
    /// never starts validating sessions against a known dev secret.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            Env::Local => env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let default_market = env::var("DEFAULT_MARKET")
            .ok()
            .filter(|market| !market.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MARKET.to_string());

        Self {
            env,
            jwt_secret,
            bind_addr,
            default_market,
        }
    }
}
