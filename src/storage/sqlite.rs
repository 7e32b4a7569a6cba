//! SQLite source store

use crate::dataset::{Row, Table, Value};
use crate::error::ReadError;
use crate::etl::{DEFAULT_BATCH_SIZE, Extractor, RowStream};

use futures::StreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use std::path::Path;

/// Open a SQLite database read-only, on a single connection
///
/// # Errors
/// Returns the driver error if the file is missing or is not a database.
pub async fn open_sqlite(path: impl AsRef<Path>) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path.as_ref())
        .read_only(true)
        .create_if_missing(false);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Extractor over the tables of a SQLite database
///
/// Each table is streamed with `SELECT *` over a cursor; rows are decoded
/// by column name, keeping the storage class SQLite reports for each value.
///
/// # Example
/// ```no_run
/// use movies_migrate::etl::{DatasetBundle, Extractor};
/// use movies_migrate::storage::{SqliteExtractor, open_sqlite};
///
/// # async fn example() -> eyre::Result<()> {
/// let pool = open_sqlite("db.sqlite").await?;
/// let extractor = SqliteExtractor::new(pool).with_batch_size(100);
/// let bundle = DatasetBundle::extract(&extractor).await?;
/// # Ok(())
/// # }
/// ```
pub struct SqliteExtractor {
    pool: SqlitePool,
    batch_size: usize,
}

impl SqliteExtractor {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the number of rows per batch (default: 50)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    async fn ensure_table(&self, table: Table) -> Result<(), ReadError> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")
                .bind(table.name())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ReadError::source_error(table, e))?;

        match found {
            Some(_) => Ok(()),
            None => Err(ReadError::MissingTable { table }),
        }
    }
}

impl Extractor for SqliteExtractor {
    fn batch_size(&self) -> usize {
        self.batch_size
    }

    async fn rows(&self, table: Table) -> Result<RowStream<'_>, ReadError> {
        self.ensure_table(table).await?;
        log::debug!("Opened source table {}", table);

        let rows = sqlx::query(table.select_sql())
            .fetch(&self.pool)
            .map(move |result| {
                result
                    .map_err(|e| ReadError::source_error(table, e))
                    .and_then(|row| decode_row(table, &row))
            });

        Ok(rows.boxed())
    }
}

fn decode_row(table: Table, row: &SqliteRow) -> Result<Row, ReadError> {
    row.columns()
        .iter()
        .map(|column| {
            let value = decode_value(row, column.ordinal())
                .map_err(|e| ReadError::source_error(table, e))?;
            Ok((column.name().to_string(), value))
        })
        .collect()
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    // Non-null values report their runtime storage class, not the declared type
    let type_info = raw.type_info();
    let value = match type_info.name() {
        "INTEGER" => Value::Integer(row.try_get_unchecked(index)?),
        "REAL" => Value::Real(row.try_get_unchecked(index)?),
        "BLOB" => Value::Blob(row.try_get_unchecked(index)?),
        _ => Value::Text(row.try_get_unchecked(index)?),
    };
    Ok(value)
}
