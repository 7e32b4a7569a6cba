//! Movies Migrate
//!
//! A one-shot, re-runnable ETL tool that copies the movies catalogue from
//! SQLite into PostgreSQL

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod etl;
pub mod migration;
pub mod storage;

// Re-exports for convenience
pub use dataset::{Row, Table, Value};
pub use error::{MigrateError, ReadError, WriteError};
pub use etl::{DatasetBundle, Extractor, Loader, MigrationReport, Pipeline};
pub use migration::{MigrateOptions, migrate};
pub use storage::{PostgresLoader, SqliteExtractor};
