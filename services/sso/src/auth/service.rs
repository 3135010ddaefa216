//! Credential service: registration, login, and admin checks.
//!
//! # Purpose
//! Owns the domain rules around credentials. Storage failures are classified
//! into [`AuthErrorKind`] here and nowhere else; the transport only translates
//! kinds into status codes.
//!
//! # Key invariants
//! - Passwords are only ever persisted as bcrypt hashes.
//! - Login checks the credential before looking up the application, so a bad
//!   password is reported as `InvalidCredentials` whatever the app id.
//! - An unknown email and a wrong password produce the same error kind.
//! - No retries: every failure is tagged with its operation and returned.
//!
//! # Concurrency model
//! The service holds immutable configuration and shared store handles only;
//! all methods take `&self` and may run concurrently. Cancelling a call (by
//! dropping its future) abandons any in-flight store work.
use crate::auth::error::{AuthError, AuthErrorKind, AuthResult};
use crate::auth::password::PasswordHasher;
use crate::auth::token::issue_token;
use crate::model::{AppId, UserId};
use crate::store::{AppStore, StoreError, UserStore};
use std::sync::Arc;
use std::time::Duration;

const OP_REGISTER: &str = "auth.register_new_user";
const OP_LOGIN: &str = "auth.login";
const OP_IS_ADMIN: &str = "auth.is_admin";

pub struct AuthService {
    users: Arc<dyn UserStore>,
    apps: Arc<dyn AppStore>,
    hasher: PasswordHasher,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        apps: Arc<dyn AppStore>,
        hasher: PasswordHasher,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            apps,
            hasher,
            token_ttl,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash the password and persist a new user, returning its id.
    ///
    /// # Errors
    /// - `HashingFailed` if bcrypt fails.
    /// - `UserAlreadyExists` if the email is already registered.
    /// - `Internal` for any other storage failure.
    pub async fn register_new_user(&self, email: &str, password: &str) -> AuthResult<UserId> {
        tracing::info!(op = OP_REGISTER, email, "registering new user");
        let result = self.register_inner(email, password).await;
        record_outcome("sso_register_total", &result);
        result
    }

    async fn register_inner(&self, email: &str, password: &str) -> AuthResult<UserId> {
        let password_hash = self.hasher.hash(password).await.map_err(|err| {
            tracing::error!(op = OP_REGISTER, error = %err, "failed to hash password");
            AuthError::with_source(OP_REGISTER, AuthErrorKind::HashingFailed, err)
        })?;

        match self.users.save_user(email, &password_hash).await {
            Ok(user_id) => {
                tracing::info!(op = OP_REGISTER, user_id, "user registered");
                Ok(user_id)
            }
            Err(StoreError::AlreadyExists(_)) => {
                tracing::warn!(op = OP_REGISTER, email, "user already exists");
                Err(AuthError::new(OP_REGISTER, AuthErrorKind::UserAlreadyExists))
            }
            Err(err) => {
                tracing::error!(op = OP_REGISTER, error = %err, "failed to save user");
                Err(AuthError::with_source(
                    OP_REGISTER,
                    AuthErrorKind::Internal,
                    err,
                ))
            }
        }
    }

    /// Verify credentials and issue a session token for `app_id`.
    ///
    /// # Errors
    /// - `InvalidCredentials` for an unknown email or a wrong password.
    /// - `AppNotFound` if the credential is valid but the app is unknown.
    /// - `HashingFailed` if the stored hash cannot be checked.
    /// - `TokenSigningFailed` if the app's secret cannot sign.
    /// - `Internal` for any other storage failure.
    pub async fn login(&self, email: &str, password: &str, app_id: AppId) -> AuthResult<String> {
        tracing::info!(op = OP_LOGIN, email, app_id, "attempting login");
        let result = self.login_inner(email, password, app_id).await;
        record_outcome("sso_login_total", &result);
        result
    }

    async fn login_inner(&self, email: &str, password: &str, app_id: AppId) -> AuthResult<String> {
        let user = match self.users.find_user_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(op = OP_LOGIN, email, "user not found");
                return Err(AuthError::new(OP_LOGIN, AuthErrorKind::InvalidCredentials));
            }
            Err(err) => {
                tracing::error!(op = OP_LOGIN, error = %err, "failed to load user");
                return Err(AuthError::with_source(
                    OP_LOGIN,
                    AuthErrorKind::Internal,
                    err,
                ));
            }
        };

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .await
            .map_err(|err| {
                tracing::error!(op = OP_LOGIN, user_id = user.id, error = %err, "stored password hash unusable");
                AuthError::with_source(OP_LOGIN, AuthErrorKind::HashingFailed, err)
            })?;
        if !matches {
            tracing::info!(op = OP_LOGIN, user_id = user.id, "invalid credentials");
            return Err(AuthError::new(OP_LOGIN, AuthErrorKind::InvalidCredentials));
        }

        let app = match self.apps.find_app(app_id).await {
            Ok(app) => app,
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(op = OP_LOGIN, app_id, "app not found");
                return Err(AuthError::new(OP_LOGIN, AuthErrorKind::AppNotFound));
            }
            Err(err) => {
                tracing::error!(op = OP_LOGIN, app_id, error = %err, "failed to load app");
                return Err(AuthError::with_source(
                    OP_LOGIN,
                    AuthErrorKind::Internal,
                    err,
                ));
            }
        };

        let token = issue_token(&user, &app, self.token_ttl).map_err(|err| {
            tracing::error!(op = OP_LOGIN, app_id, error = %err, "failed to sign token");
            AuthError::with_source(OP_LOGIN, AuthErrorKind::TokenSigningFailed, err)
        })?;
        tracing::info!(op = OP_LOGIN, user_id = user.id, app_id, "user logged in");
        Ok(token)
    }

    /// Report whether `user_id` holds the admin flag.
    ///
    /// Intended for trusted callers: an unknown id is reported as
    /// `UserNotFound` rather than hidden.
    pub async fn is_admin(&self, user_id: UserId) -> AuthResult<bool> {
        tracing::info!(op = OP_IS_ADMIN, user_id, "checking admin flag");
        let result = match self.users.is_admin(user_id).await {
            Ok(is_admin) => {
                tracing::info!(op = OP_IS_ADMIN, user_id, is_admin, "checked admin flag");
                Ok(is_admin)
            }
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(op = OP_IS_ADMIN, user_id, "user not found");
                Err(AuthError::new(OP_IS_ADMIN, AuthErrorKind::UserNotFound))
            }
            Err(err) => {
                tracing::error!(op = OP_IS_ADMIN, user_id, error = %err, "failed to check admin flag");
                Err(AuthError::with_source(
                    OP_IS_ADMIN,
                    AuthErrorKind::Internal,
                    err,
                ))
            }
        };
        record_outcome("sso_is_admin_total", &result);
        result
    }
}

fn record_outcome<T>(metric: &'static str, result: &AuthResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.kind().as_str(),
    };
    metrics::counter!(metric, "outcome" => outcome).increment(1);
}
