//! # Ladder Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL ledger. It is the system's only read path.
//!
//! ## Architectural Principles
//!
//! - **Read-only adapter:** this crate encapsulates all database-specific
//!   logic. It provides a clean, abstract API to the rest of the application,
//!   hiding the underlying SQL, table names and raw column representations.
//! - **Mapping at the boundary:** the ledger stores types, statuses and flags
//!   as free text; every such column is mapped to a typed enum exactly once,
//!   here, so nothing upstream ever parses a string.
//! - **Asynchronous & Pooled:** all operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for concurrent entity fetches.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `LedgerRepository`: The main struct that holds the connection pool and
//!   provides the per-entity fetches plus `load_bundle`.
//! - `LedgerBundle`: every entity table in one struct, ready to become a
//!   snapshot.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use repository::{LedgerBundle, LedgerRepository};
