//! Database stores on either side of the migration
//!
//! This module holds the concrete ends of the pipeline:
//! - SQLite source, read-only and streamed table by table
//! - PostgreSQL target, written with batched idempotent upserts

mod postgres;
mod sqlite;

pub use postgres::{DEFAULT_SCHEMA, PostgresLoader, connect_postgres};
pub use sqlite::{SqliteExtractor, open_sqlite};
