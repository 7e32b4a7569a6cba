//! Loader trait for writing batches to a target store

use super::{DatasetBundle, MigrationReport, TableReport};
use crate::dataset::{Row, Table};
use crate::error::{BoxError, MigrateError, WriteError};

/// Loader trait for persisting rows to a target store
///
/// Implementors provide [`Loader::upsert`], a single bulk write of one batch
/// that skips rows whose primary key already exists. Draining a whole
/// [`DatasetBundle`] in dependency order is provided by [`Loader::load`].
///
/// # Example
/// ```no_run
/// use movies_migrate::dataset::{Row, Table};
/// use movies_migrate::error::BoxError;
/// use movies_migrate::etl::Loader;
///
/// struct CountingLoader;
///
/// impl Loader for CountingLoader {
///     async fn upsert(&self, _table: Table, rows: &[Row]) -> Result<u64, BoxError> {
///         Ok(rows.len() as u64)
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// Insert every row of the batch in one statement, ignoring rows whose
    /// id is already present
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    /// Returns the driver error if the target rejects the batch.
    fn upsert(
        &self,
        table: Table,
        rows: &[Row],
    ) -> impl std::future::Future<Output = Result<u64, BoxError>> + Send;

    /// Drain `bundle` into the target, table by table in load order
    ///
    /// The first failing batch ends the load: its [`WriteError`] is
    /// returned and no further batch of any table is attempted. Batches
    /// written before it stay written.
    ///
    /// # Errors
    /// Returns a [`MigrateError`] wrapping the first read or write failure.
    fn load(
        &self,
        bundle: DatasetBundle<'_>,
    ) -> impl std::future::Future<Output = Result<MigrationReport, MigrateError>> + Send {
        async move {
            let mut report = MigrationReport::default();

            for mut batches in bundle.into_load_order() {
                let table = batches.table();
                let mut stats = TableReport::new(table);
                log::debug!("Loading {}", table);

                while let Some(batch) = batches.next_batch().await? {
                    let inserted = self
                        .upsert(table, &batch)
                        .await
                        .map_err(|source| WriteError {
                            table,
                            batch: stats.batches,
                            source,
                        })?;
                    log::debug!(
                        "Batch {} of {}: {} row(s), {} inserted",
                        stats.batches,
                        table,
                        batch.len(),
                        inserted
                    );
                    stats.record(batch.len(), inserted);
                }

                log::info!(
                    "Loaded {}: {} row(s) read, {} inserted, {} already present",
                    table,
                    stats.read,
                    stats.inserted,
                    stats.skipped()
                );
                report.push(stats);
            }

            Ok(report)
        }
    }
}
