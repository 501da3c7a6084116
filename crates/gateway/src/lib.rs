//! The Redverse identity gateway — HTTP surface and administrative CLI on
//! top of the resolution and reconciliation crates.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod state;
