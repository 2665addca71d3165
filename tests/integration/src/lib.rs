//! Integration test utilities for the readalong server
//!
//! Spawns the full HTTP stack on an ephemeral port, backed by the in-memory store, and
//! drives it over real HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
