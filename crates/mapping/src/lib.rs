//! The side-mapping store — key-value bridges between legacy identifiers
//! and email addresses, written once during the historical bulk migration
//! and consulted by the resolution fallback chain.

pub mod keys;
pub mod memory;
pub mod redis_store;
pub mod store;
pub mod types;
