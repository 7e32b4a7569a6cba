//! Pipeline orchestration for migration runs

use super::{DatasetBundle, Extractor, Loader, MigrationReport};
use crate::error::MigrateError;

/// Migration pipeline that wires an [`Extractor`] to a [`Loader`]
///
/// # Type Parameters
/// - `E`: Extractor over the source store
/// - `L`: Loader over the target store
///
/// # Example
/// ```no_run
/// use movies_migrate::etl::Pipeline;
/// use movies_migrate::storage::{PostgresLoader, SqliteExtractor};
///
/// # async fn example(source: sqlx::SqlitePool, target: sqlx::PgPool) -> eyre::Result<()> {
/// let pipeline = Pipeline::new(SqliteExtractor::new(source), PostgresLoader::new(target));
///
/// let report = pipeline.run().await?;
/// println!("Inserted {} rows", report.total_inserted());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, L> {
    extractor: E,
    loader: L,
}

impl<E, L> Pipeline<E, L>
where
    E: Extractor,
    L: Loader,
{
    /// Create a new pipeline
    pub fn new(extractor: E, loader: L) -> Self {
        Self { extractor, loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Run the complete migration
    ///
    /// Steps:
    /// 1. Open every source table into a [`DatasetBundle`]
    /// 2. Drain the bundle into the target, entities before links
    ///
    /// # Errors
    /// Returns the first [`MigrateError`]; nothing is retried.
    pub async fn run(&self) -> Result<MigrationReport, MigrateError> {
        log::info!("Starting migration");

        log::debug!("Extracting from source...");
        let bundle = DatasetBundle::extract(&self.extractor).await?;

        log::debug!("Loading to target...");
        let report = self.loader.load(bundle).await?;

        log::info!(
            "Migration complete: {} row(s) read, {} inserted",
            report.total_read(),
            report.total_inserted()
        );

        Ok(report)
    }
}
