//! PostgreSQL target store

use crate::dataset::{Column, Row, Table, Value};
use crate::error::BoxError;
use crate::etl::Loader;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};

/// Schema the catalogue tables live in
pub const DEFAULT_SCHEMA: &str = "content";

/// Connect to PostgreSQL on a single connection
///
/// # Errors
/// Returns the driver error if the server cannot be reached or refuses the
/// credentials.
pub async fn connect_postgres(options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Loader that upserts batches into the catalogue schema
///
/// Each batch becomes one `INSERT ... VALUES (...), (...) ON CONFLICT (id)
/// DO NOTHING`. Values are bound as parameters and cast to the column type
/// on the server, so SQLite text timestamps and ids land in `timestamptz`
/// and `uuid` columns unchanged.
///
/// # Example
/// ```no_run
/// use movies_migrate::dataset::{Row, Table};
/// use movies_migrate::etl::Loader;
/// use movies_migrate::storage::PostgresLoader;
///
/// # async fn example(pool: sqlx::PgPool) -> eyre::Result<()> {
/// let loader = PostgresLoader::new(pool).with_schema("content");
/// let genre = Row::new()
///     .with("id", "3d8d9bf5-0d90-4353-88ba-4ccc5d2c07ff")
///     .with("name", "Action")
///     .with("description", None::<String>)
///     .with("created", "2021-06-16 20:14:09.309735+00")
///     .with("modified", "2021-06-16 20:14:09.309735+00");
///
/// let inserted = loader.upsert(Table::Genre, &[genre]).await.map_err(|e| eyre::eyre!(e))?;
/// # Ok(())
/// # }
/// ```
pub struct PostgresLoader {
    pool: PgPool,
    schema: String,
}

impl PostgresLoader {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// Set the target schema (default: "content")
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }
}

impl Loader for PostgresLoader {
    async fn upsert(&self, table: Table, rows: &[Row]) -> Result<u64, BoxError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut query = upsert_query(&self.schema, table, rows)?;
        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Build the bulk upsert for one batch
///
/// # Errors
/// Fails if a row lacks one of the table's columns.
pub(crate) fn upsert_query(
    schema: &str,
    table: Table,
    rows: &[Row],
) -> Result<QueryBuilder<'static, Postgres>, BoxError> {
    let columns = table.columns();
    if let Some((id, column)) = rows.iter().find_map(|row| {
        columns
            .iter()
            .find(|c| row.get(c.name).is_none())
            .map(|c| (row.id().unwrap_or("?"), c.name))
    }) {
        return Err(format!("row {id} of {table} has no `{column}` column").into());
    }

    let column_list = columns
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ");

    let mut query = QueryBuilder::new(format!(
        "INSERT INTO {}.{} ({}) ",
        quote_ident(schema),
        table.name(),
        column_list
    ));

    query.push_values(rows, |mut tuple, row| {
        for column in columns {
            // Presence checked above
            let value = row.get(column.name).unwrap_or(&Value::Null);
            push_value(&mut tuple, column, value);
        }
    });
    query.push(" ON CONFLICT (id) DO NOTHING");

    Ok(query)
}

fn push_value(
    tuple: &mut Separated<'_, 'static, Postgres, &'static str>,
    column: &Column,
    value: &Value,
) {
    match value {
        Value::Null => tuple.push_bind(None::<String>),
        Value::Integer(v) => tuple.push_bind(*v),
        Value::Real(v) => tuple.push_bind(*v),
        Value::Text(v) => tuple.push_bind(v.clone()),
        Value::Blob(v) => tuple.push_bind(v.clone()),
    };
    tuple.push_unseparated(format!("::{}", column.sql_type));
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
