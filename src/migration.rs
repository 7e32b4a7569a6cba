//! SQLite to PostgreSQL migration of the movies catalogue
//!
//! Wires the SQLite extractor to the PostgreSQL loader for one run:
//!
//! ```text
//! film_work ─┐
//! genre ─────┤                         film_work → genre → person
//! person ────┼─► DatasetBundle ─► load:     → genre_film_work
//! genre_fw ──┤                              → person_film_work
//! person_fw ─┘
//! ```

use crate::error::MigrateError;
use crate::etl::{DEFAULT_BATCH_SIZE, MigrationReport, Pipeline};
use crate::storage::{DEFAULT_SCHEMA, PostgresLoader, SqliteExtractor};
use sqlx::{PgPool, SqlitePool};

/// Tunables of a migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateOptions {
    pub batch_size: usize,
    pub schema: String,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }
}

impl MigrateOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }
}

/// Copy every table of `source` into `target`
///
/// Safe to re-run: rows already present on the target are skipped. The
/// pools are borrowed; closing them stays with the caller.
///
/// # Example
/// ```no_run
/// use movies_migrate::migration::{MigrateOptions, migrate};
/// use movies_migrate::storage::open_sqlite;
///
/// # async fn example(target: sqlx::PgPool) -> eyre::Result<()> {
/// let source = open_sqlite("db.sqlite").await?;
/// let report = migrate(&source, &target, &MigrateOptions::default()).await?;
/// println!("{} rows inserted", report.total_inserted());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns a [`MigrateError`] on the first read or write failure.
pub async fn migrate(
    source: &SqlitePool,
    target: &PgPool,
    options: &MigrateOptions,
) -> Result<MigrationReport, MigrateError> {
    let extractor = SqliteExtractor::new(source.clone()).with_batch_size(options.batch_size);
    let loader = PostgresLoader::new(target.clone()).with_schema(&options.schema);

    Pipeline::new(extractor, loader).run().await
}
