//! Credential verification and token issuance.
//!
//! # Purpose
//! Groups the credential service, its error taxonomy, password hashing, and
//! session token minting.
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use error::{AuthError, AuthErrorKind, AuthResult};
pub use service::AuthService;
