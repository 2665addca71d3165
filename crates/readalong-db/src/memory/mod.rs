//! In-memory implementation of every repository port
//!
//! Backs service tests and the HTTP integration tests. Semantics match the PostgreSQL
//! repositories: last-write-wins progress, atomic like writes, one pending report per
//! reader per comment, and counts recomputed from the ledgers on every read.

mod store;

pub use store::MemoryStore;
