//! Registered user records.
use std::fmt;

pub type UserId = i64;

/// A user as persisted by the store.
///
/// `password_hash` is a bcrypt hash string stored as raw bytes; it is never
/// derived from anything but the one-way hash of the registration password.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: Vec<u8>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
