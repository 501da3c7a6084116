//! Shared domain types for the Redverse identity service: the normalized
//! user record, the configuration tree, the error taxonomy, and structured
//! trace events.

pub mod config;
pub mod error;
pub mod trace;
pub mod user;
