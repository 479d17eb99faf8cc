//! Session tokens and the session cookie.
//!
//! A session is a small JSON payload ([`SessionClaims`]) signed as an HS256
//! JWT and carried in an `HttpOnly` cookie. There is no server-side session
//! table: logging out only expires the cookie, and a token stays valid until
//! its `exp`, which always matches the cookie's `Max-Age`.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use inmo_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default session lifetime: one working day.
const DEFAULT_MAX_AGE_SECS: i64 = 8 * 60 * 60;
/// Default cookie name.
const DEFAULT_COOKIE_NAME: &str = "inmo_session";

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub name: String,
    pub email: String,
    /// The user's role (`"gestor"` or `"arquitecto"`).
    pub rol: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Session signing and cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify session tokens.
    pub secret: String,
    /// Session lifetime in seconds; also the cookie `Max-Age`.
    pub max_age_secs: i64,
    pub cookie_name: String,
    /// Add the `Secure` attribute (HTTPS deployments).
    pub secure: bool,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default        |
    /// |-------------------------|----------|----------------|
    /// | `SESSION_SECRET`        | **yes**  | --             |
    /// | `SESSION_MAX_AGE_SECS`  | no       | `28800`        |
    /// | `SESSION_COOKIE_NAME`   | no       | `inmo_session` |
    /// | `SESSION_COOKIE_SECURE` | no       | `false`        |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_SECRET` is not set or is empty, or a numeric /
    /// boolean variable does not parse.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_SECRET must not be empty");

        let max_age_secs: i64 = std::env::var("SESSION_MAX_AGE_SECS")
            .unwrap_or_else(|_| DEFAULT_MAX_AGE_SECS.to_string())
            .parse()
            .expect("SESSION_MAX_AGE_SECS must be a valid i64");

        let cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.into());

        let secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be 'true' or 'false'");

        Self {
            secret,
            max_age_secs,
            cookie_name,
            secure,
        }
    }
}

/// Issue a signed session token for a user.
pub fn issue_token(
    user_id: DbId,
    name: &str,
    email: &str,
    rol: &str,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id,
        name: name.to_string(),
        email: email.to_string(),
        rol: rol.to_string(),
        iat: now,
        exp: now + config.max_age_secs,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded claims.
///
/// Validates the signature and the `exp` claim.
pub fn validate_token(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// `Set-Cookie` value that stores `token` for the session lifetime.
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, config.max_age_secs
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find the value of cookie `name` across all `Cookie` request headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}
