//! Administrative reconciliation — bulk transfer of ownership rows from a
//! legacy identifier to a current directory identifier.

pub mod datastore;
pub mod migration;
pub mod types;

pub use migration::Reconciler;
