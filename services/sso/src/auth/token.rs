//! Session token issuance and verification.
//!
//! # Purpose
//! Builds the signed, time-bounded token returned by a successful login. The
//! token asserts a user's identity to exactly one application and is signed
//! with that application's secret.
//!
//! # Key invariants
//! - Tokens are HS256 JWTs keyed by [`App::secret`]; nothing else signs them.
//! - `uid`, `email`, `appId` and `exp` are always present; `exp` is absolute
//!   unix seconds (`iat + ttl`).
//! - An empty secret is malformed key material and is refused before signing.
//!
//! # Security boundary
//! There is no revocation list and no introspection endpoint: any holder of
//! the application secret verifies tokens on their own with [`verify_token`].
//! Never log issued tokens or application secrets.
use crate::model::{App, AppId, User, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Claims carried by a session token.
///
/// # Examples
/// ```rust
/// use sso::auth::token::SessionClaims;
///
/// let claims = SessionClaims {
///     uid: 42,
///     email: "user@example.com".to_string(),
///     app_id: 1,
///     exp: 1_700_003_600,
///     iat: 1_700_000_000,
/// };
/// assert_eq!(claims.exp - claims.iat, 3600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: UserId,
    pub email: String,
    #[serde(rename = "appId")]
    pub app_id: AppId,
    pub exp: i64,
    pub iat: i64,
}

/// Errors produced while signing or verifying session tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("application {app_id} has an empty signing secret")]
    EmptySecret { app_id: AppId },
    #[error("token ttl of {ttl_secs}s overflows the expiry timestamp")]
    ExpiryOverflow { ttl_secs: u64 },
    #[error("token was minted for application {found}, not {expected}")]
    WrongApp { expected: AppId, found: AppId },
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Issue a session token for `user` scoped to `app`.
///
/// # Errors
/// - `TokenError::EmptySecret` if the application secret is empty.
/// - `TokenError::ExpiryOverflow` if `iat + ttl` does not fit a timestamp.
/// - `TokenError::Jwt` if encoding fails.
///
/// # Examples
/// ```rust
/// use sso::auth::token::issue_token;
/// use sso::model::{App, User};
/// use std::time::Duration;
///
/// let user = User { id: 1, email: "a@example.com".into(), password_hash: vec![] };
/// let app = App { id: 1, name: "test".into(), secret: b"test-secret".to_vec() };
/// let token = issue_token(&user, &app, Duration::from_secs(60)).expect("token");
/// assert!(!token.is_empty());
/// ```
pub fn issue_token(user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
    if app.secret.is_empty() {
        return Err(TokenError::EmptySecret { app_id: app.id });
    }
    let iat = now_epoch_seconds();
    let exp = expiry(iat, ttl)?;
    let claims = SessionClaims {
        uid: user.id,
        email: user.email.clone(),
        app_id: app.id,
        exp,
        iat,
    };
    let key = EncodingKey::from_secret(&app.secret);
    Ok(jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &key,
    )?)
}

/// Verify a session token against the issuing application's secret.
///
/// Checks the HS256 signature, the expiry (with `leeway` seconds of clock
/// skew), and that the token names `app` as its audience application.
///
/// # Errors
/// - `TokenError::EmptySecret` if the application secret is empty.
/// - `TokenError::WrongApp` if the token names a different application.
/// - `TokenError::Jwt` for bad signatures, expired tokens, or malformed input.
pub fn verify_token(app: &App, token: &str, leeway: u64) -> Result<SessionClaims, TokenError> {
    if app.secret.is_empty() {
        return Err(TokenError::EmptySecret { app_id: app.id });
    }
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway;
    let decoded = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(&app.secret),
        &validation,
    )?;
    // A valid signature under a shared secret does not prove the token was
    // meant for this app.
    if decoded.claims.app_id != app.id {
        return Err(TokenError::WrongApp {
            expected: app.id,
            found: decoded.claims.app_id,
        });
    }
    Ok(decoded.claims)
}

fn expiry(iat: i64, ttl: Duration) -> Result<i64, TokenError> {
    let ttl_secs = ttl.as_secs();
    i64::try_from(ttl_secs)
        .ok()
        .and_then(|secs| iat.checked_add(secs))
        .ok_or(TokenError::ExpiryOverflow { ttl_secs })
}

fn now_epoch_seconds() -> i64 {
    // Clamp a clock set before the epoch to zero rather than panicking.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}
