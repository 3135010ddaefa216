//! Credential service errors.
//!
//! # Key invariants
//! - [`AuthErrorKind`] is the closed taxonomy callers branch on; messages are
//!   for humans and logs only.
//! - `InvalidCredentials` deliberately covers both an unknown email and a wrong
//!   password.
//! - Every [`AuthError`] carries the operation that produced it and, where one
//!   exists, the underlying cause via [`std::error::Error::source`].
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthErrorKind {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("app not found")]
    AppNotFound,
    #[error("password hashing failed")]
    HashingFailed,
    #[error("token signing failed")]
    TokenSigningFailed,
    #[error("internal error")]
    Internal,
}

impl AuthErrorKind {
    /// Stable label used for metrics and wire error codes.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::InvalidCredentials => "invalid_credentials",
            AuthErrorKind::UserAlreadyExists => "already_exists",
            AuthErrorKind::UserNotFound => "user_not_found",
            AuthErrorKind::AppNotFound => "app_not_found",
            AuthErrorKind::HashingFailed => "hashing_failed",
            AuthErrorKind::TokenSigningFailed => "token_signing_failed",
            AuthErrorKind::Internal => "internal",
        }
    }

    /// True when the caller supplied something wrong, false for server faults.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            AuthErrorKind::InvalidCredentials
                | AuthErrorKind::UserAlreadyExists
                | AuthErrorKind::UserNotFound
                | AuthErrorKind::AppNotFound
        )
    }
}

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug)]
pub struct AuthError {
    op: &'static str,
    kind: AuthErrorKind,
    source: Option<BoxError>,
}

impl AuthError {
    pub fn new(op: &'static str, kind: AuthErrorKind) -> Self {
        Self {
            op,
            kind,
            source: None,
        }
    }

    pub fn with_source(
        op: &'static str,
        kind: AuthErrorKind,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            op,
            kind,
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.op, self.kind)
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
