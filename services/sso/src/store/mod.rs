//! Storage port for users and applications.
//!
//! # Purpose
//! Defines the persistence contract the credential service depends on. The
//! contract carries no business logic; backends only classify their own
//! failures into [`StoreError`] so the service can map them exactly once.
//!
//! # Key invariants
//! - Email uniqueness is enforced here, never by callers.
//! - Every operation is a single atomic read or write; nothing is
//!   transactional across calls.
//! - Implementations are shared across in-flight requests and must be safe for
//!   concurrent use.
//!
//! # Cancellation
//! Operations are plain futures: dropping one abandons the work. Deadlines
//! come from the caller (the transport's request timeout) and from the
//! backend's own pool acquire timeout.
use crate::model::{App, AppId, User, UserId};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return the id assigned by the backend.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when the email is taken.
    async fn save_user(&self, email: &str, password_hash: &[u8]) -> StoreResult<UserId>;

    /// Fails with [`StoreError::NotFound`] when no user has this email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<User>;

    /// Fails with [`StoreError::NotFound`] when the user does not exist.
    async fn is_admin(&self, user_id: UserId) -> StoreResult<bool>;
}

#[async_trait]
pub trait AppStore: Send + Sync {
    /// Fails with [`StoreError::NotFound`] when the app does not exist.
    async fn find_app(&self, app_id: AppId) -> StoreResult<App>;
}

/// A complete backend: both halves of the port plus operational probes.
#[async_trait]
pub trait IdentityStore: UserStore + AppStore {
    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
