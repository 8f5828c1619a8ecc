//! SQLite persistence for the Orbit scoring engine.
//!
//! A single serialized write connection, `user_version`-gated
//! migrations over STRICT tables, per-table query modules, and
//! [`store::SqliteScoreStore`] — the production implementation of the
//! `orbit-scoring` store traits.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::Database;
pub use store::SqliteScoreStore;
