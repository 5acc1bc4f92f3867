//! # Client Directory
//!
//! Resolves the display metadata (name, CPF, plan, platform) attached to an
//! analysis report. Records are owned by the back office; this crate only reads.
//!
//! ## Public API
//!
//! - `ClientRepository`: the lookup contract the analyzer depends on.
//! - `DbRepository`: PostgreSQL implementation over the `clients` table.
//! - `InMemoryClientRepository`: a fixed, in-process directory.
//! - `connect` / `run_migrations` / `database_url_from_env`: pool setup.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, database_url_from_env, run_migrations};
pub use error::DbError;
pub use repository::{ClientRepository, DbRepository, InMemoryClientRepository};
