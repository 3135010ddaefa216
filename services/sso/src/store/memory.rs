//! In-memory implementation of the identity store.
//!
//! # Purpose
//! Implements [`UserStore`] and [`AppStore`] with `HashMap`s guarded by
//! `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all users are lost on process restart.
//! - Registration takes the users write lock for the uniqueness check and the
//!   insert together, so concurrent registrations of one email cannot both win.
//! - Applications are seeded at construction (or through [`InMemoryStore::insert_app`])
//!   since their lifecycle is managed outside the service.
use super::{AppStore, IdentityStore, StoreError, StoreResult, UserStore};
use crate::model::{App, AppId, User, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct UserRecord {
    user: User,
    is_admin: bool,
}

/// Authoritative user rows plus the email index used for uniqueness.
#[derive(Debug)]
struct UserTable {
    next_id: UserId,
    by_id: HashMap<UserId, UserRecord>,
    by_email: HashMap<String, UserId>,
}

impl Default for UserTable {
    fn default() -> Self {
        // Ids start at 1 to match SQL sequences; 0 is rejected by the transport.
        Self {
            next_id: 1,
            by_id: HashMap::new(),
            by_email: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<UserTable>,
    apps: RwLock<HashMap<AppId, App>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_apps(apps: impl IntoIterator<Item = App>) -> Self {
        let apps = apps.into_iter().map(|app| (app.id, app)).collect();
        Self {
            users: RwLock::new(UserTable::default()),
            apps: RwLock::new(apps),
        }
    }

    /// Register or replace an application.
    pub async fn insert_app(&self, app: App) {
        self.apps.write().await.insert(app.id, app);
    }

    /// Flip a user's admin flag. Admin management is an operator concern, so
    /// this lives outside the store traits.
    pub async fn set_admin(&self, user_id: UserId, is_admin: bool) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let record = users
            .by_id
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        record.is_admin = is_admin;
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn save_user(&self, email: &str, password_hash: &[u8]) -> StoreResult<UserId> {
        let mut users = self.users.write().await;
        if users.by_email.contains_key(email) {
            return Err(StoreError::AlreadyExists("user".into()));
        }
        let id = users.next_id;
        users.next_id += 1;
        users.by_email.insert(email.to_string(), id);
        users.by_id.insert(
            id,
            UserRecord {
                user: User {
                    id,
                    email: email.to_string(),
                    password_hash: password_hash.to_vec(),
                },
                is_admin: false,
            },
        );
        metrics::gauge!("sso_users_total").set(users.by_id.len() as f64);
        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let users = self.users.read().await;
        users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .map(|record| record.user.clone())
            .ok_or_else(|| StoreError::NotFound("user".into()))
    }

    async fn is_admin(&self, user_id: UserId) -> StoreResult<bool> {
        self.users
            .read()
            .await
            .by_id
            .get(&user_id)
            .map(|record| record.is_admin)
            .ok_or_else(|| StoreError::NotFound("user".into()))
    }
}

#[async_trait]
impl AppStore for InMemoryStore {
    async fn find_app(&self, app_id: AppId) -> StoreResult<App> {
        self.apps
            .read()
            .await
            .get(&app_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("app".into()))
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        // Nothing external to check.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
