//! Identity data model.
//!
//! # Purpose
//! Re-exports the user and application records shared by the store, the
//! credential service, and the token issuer.
mod app;
mod user;

pub use app::{App, AppId};
pub use user::{User, UserId};
