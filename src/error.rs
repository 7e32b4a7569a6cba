//! Typed failures of a migration run
//!
//! A run has exactly two failure exits: the source could not be read
//! ([`ReadError`]) or the target rejected a batch ([`WriteError`]). Both are
//! folded into [`MigrateError`] at the pipeline boundary.

use crate::dataset::Table;
use thiserror::Error;

/// Boxed driver error carried as the cause of a read or write failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The source store could not produce the rows of a table
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("table `{table}` does not exist in the source database")]
    MissingTable { table: Table },

    #[error("failed to read table `{table}`")]
    Source {
        table: Table,
        #[source]
        source: BoxError,
    },

    #[error("malformed row in table `{table}`: {reason}")]
    MalformedRow { table: Table, reason: String },
}

impl ReadError {
    pub fn source_error(table: Table, source: impl Into<BoxError>) -> Self {
        Self::Source {
            table,
            source: source.into(),
        }
    }

    /// Table the failure belongs to
    pub fn table(&self) -> Table {
        match self {
            Self::MissingTable { table }
            | Self::Source { table, .. }
            | Self::MalformedRow { table, .. } => *table,
        }
    }
}

/// The target store rejected one batch of a table
///
/// `batch` is the zero-based index of the batch within its table.
#[derive(Debug, Error)]
#[error("failed to write batch {batch} of table `{table}`")]
pub struct WriteError {
    pub table: Table,
    pub batch: usize,
    #[source]
    pub source: BoxError,
}

/// Any failure that ends a migration run
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl MigrateError {
    pub fn table(&self) -> Table {
        match self {
            Self::Read(e) => e.table(),
            Self::Write(e) => e.table,
        }
    }
}
