//! Single sign-on credential service library crate.
//!
//! # Purpose
//! Exposes user registration, login with per-application session tokens, and
//! admin lookups, together with the HTTP surface, configuration, and storage
//! backends used by the binary and tests.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
