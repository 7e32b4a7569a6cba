//! CLI helper functions

use crate::{
    config::PostgresSettings,
    error::MigrateError,
    etl::MigrationReport,
    storage::{connect_postgres, open_sqlite},
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use sqlx::{PgPool, SqlitePool};
use std::path::Path;

/// Open the SQLite source read-only
pub async fn open_source(path: impl AsRef<Path>) -> Result<SqlitePool> {
    let path = path.as_ref();
    if !path.is_file() {
        eyre::bail!("SQLite database not found: {}", path.display());
    }

    log::debug!("Opening SQLite database {}", path.display());
    open_sqlite(path)
        .await
        .with_context(|| format!("Failed to open SQLite database: {}", path.display()))
}

/// Connect to the PostgreSQL target
pub async fn connect_target(settings: &PostgresSettings) -> Result<PgPool> {
    log::debug!(
        "Connecting to PostgreSQL {}:{}/{} as {}",
        settings.host,
        settings.port,
        settings.database,
        settings.user
    );
    connect_postgres(settings.connect_options())
        .await
        .with_context(|| {
            format!(
                "Failed to connect to PostgreSQL at {}:{}",
                settings.host, settings.port
            )
        })
}

/// Log the per-table outcome of a successful run
pub fn log_report(report: &MigrationReport) {
    for table in report.tables() {
        log::info!(
            "{}: {} read, {} inserted, {} skipped",
            table.table.cyan(),
            table.read,
            table.inserted,
            table.skipped()
        );
    }
    log::info!(
        "✓ Migrated {} row(s), {} already present",
        report.total_inserted(),
        report.total_skipped()
    );
}

/// Log why a run stopped
pub fn log_failure(err: &MigrateError) {
    match err {
        MigrateError::Read(_) => {
            log::error!("Cannot read source, migration aborted: {}", error_chain(err))
        }
        MigrateError::Write(_) => log::error!(
            "Write to target failed, remaining writes abandoned: {}",
            error_chain(err)
        ),
    }
    log::error!("Fix the cause and re-run; rows already written will be skipped");
}

/// Render an error and its sources on one line
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
