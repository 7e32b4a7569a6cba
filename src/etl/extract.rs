//! Extractor trait and batched table reads

use crate::dataset::{Row, Table};
use crate::error::ReadError;
use futures::TryStreamExt;
use futures::stream::BoxStream;

/// Default number of rows moved per read and per write
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Lazy, single-pass stream of rows from one source table
pub type RowStream<'a> = BoxStream<'a, Result<Row, ReadError>>;

/// Extractor trait for reading tables from a source store
///
/// Implementors only need to open a row stream per table; batching is
/// provided on top of it by [`Extractor::extract`].
///
/// # Example
/// ```no_run
/// use futures::StreamExt;
/// use movies_migrate::dataset::{Row, Table};
/// use movies_migrate::error::ReadError;
/// use movies_migrate::etl::{Extractor, RowStream};
///
/// struct EmptySource;
///
/// impl Extractor for EmptySource {
///     async fn rows(&self, _table: Table) -> Result<RowStream<'_>, ReadError> {
///         Ok(futures::stream::empty::<Result<Row, ReadError>>().boxed())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Rows per batch
    fn batch_size(&self) -> usize {
        DEFAULT_BATCH_SIZE
    }

    /// Open a lazy row stream over `table`
    ///
    /// # Errors
    /// Returns a [`ReadError`] if the table cannot be read at all (missing
    /// table, connection failure). Per-row failures surface from the stream.
    fn rows(
        &self,
        table: Table,
    ) -> impl std::future::Future<Output = Result<RowStream<'_>, ReadError>> + Send;

    /// Open `table` as a sequence of fixed-size batches
    fn extract(
        &self,
        table: Table,
    ) -> impl std::future::Future<Output = Result<Batches<'_>, ReadError>> + Send {
        async move {
            let rows = self.rows(table).await?;
            Ok(Batches::new(table, rows, self.batch_size()))
        }
    }
}

/// Fixed-size batches drawn from a row stream
///
/// Holds at most one batch in memory. The last batch may be shorter than
/// the batch size; an exhausted table never yields an empty batch. Every
/// row is conformed to the target columns of the table as it is read.
pub struct Batches<'a> {
    table: Table,
    batch_size: usize,
    rows: RowStream<'a>,
    exhausted: bool,
}

impl<'a> Batches<'a> {
    /// Batch `rows` of `table` into groups of `batch_size`
    ///
    /// # Panics
    /// Panics in debug builds if `batch_size` is zero. Callers validate the
    /// size up front (see [`crate::config::validate_batch_size`]); release
    /// builds fall back to single-row batches rather than reading nothing.
    pub fn new(table: Table, rows: RowStream<'a>, batch_size: usize) -> Self {
        debug_assert!(batch_size > 0, "batch size must be at least 1");
        Self {
            table,
            batch_size: batch_size.max(1),
            rows,
            exhausted: false,
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Read the next batch, or `None` once the table is exhausted
    ///
    /// # Errors
    /// Returns the first [`ReadError`] raised by the stream or by a row that
    /// does not carry the columns the target expects.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Row>>, ReadError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.rows.try_next().await? {
                Some(row) => batch.push(row.conform_to(self.table)?),
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }
}
