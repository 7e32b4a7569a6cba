use clap::{Parser, builder::styling};
use eyre::{Context, Result};
use movies_migrate::{
    cli,
    config::{PostgresSettings, validate_batch_size},
    etl::DEFAULT_BATCH_SIZE,
    migration::{MigrateOptions, migrate},
    storage::DEFAULT_SCHEMA,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Movies Migrate: copy the movies catalogue from SQLite into PostgreSQL, safe to re-run
#[derive(Parser)]
#[command(name = "movies-migrate", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long)]
    debug: bool,

    /// SQLite database to read from
    #[arg(long, env = "SQLITE_PATH", default_value = "db.sqlite")]
    sqlite: PathBuf,

    /// PostgreSQL schema holding the catalogue tables
    #[arg(long, env = "DB_SCHEMA", default_value = DEFAULT_SCHEMA)]
    schema: String,

    /// Rows per read and per upsert statement
    #[arg(long, env = "BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    let dotenv = dotenvy::from_filename(&args.env);
    // Parse again so env-backed options see values from the dotenv file
    let args = Cli::parse();

    let log_level = match args.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenv {
        Ok(path) => log::debug!("Sourced {}", path.display()),
        Err(e) if e.not_found() => {
            log::debug!("No {} file, using the process environment", args.env)
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to source {}", args.env)),
    }

    let batch_size = validate_batch_size(args.batch_size)?;
    let settings = PostgresSettings::from_env(&args.schema)?;
    let options = MigrateOptions::default()
        .with_batch_size(batch_size)
        .with_schema(&settings.schema);

    log::info!(
        "Migrating {} into {} (schema {}, batches of {})",
        args.sqlite.display().bright_black(),
        settings.database.bright_black(),
        settings.schema.cyan(),
        batch_size
    );

    let source = cli::open_source(&args.sqlite).await?;
    let target = match cli::connect_target(&settings).await {
        Ok(target) => target,
        Err(e) => {
            source.close().await;
            return Err(e);
        }
    };

    let outcome = migrate(&source, &target, &options).await;

    source.close().await;
    target.close().await;
    log::debug!("Closed source and target connections");

    match outcome {
        Ok(report) => {
            cli::log_report(&report);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            cli::log_failure(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}
