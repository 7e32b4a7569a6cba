//! Shared fixtures: a SQLite source on disk and an in-memory target

#![allow(dead_code)]

use movies_migrate::dataset::{Row, Table, Value};
use movies_migrate::error::BoxError;
use movies_migrate::etl::Loader;
use movies_migrate::storage::open_sqlite;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Layout of the reference SQLite dump
pub const SOURCE_SCHEMA: &[&str] = &[
    "CREATE TABLE film_work (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        creation_date DATE,
        certificate TEXT,
        file_path TEXT,
        rating FLOAT,
        type TEXT NOT NULL,
        created_at timestamp with time zone,
        updated_at timestamp with time zone
    )",
    "CREATE TABLE genre (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at timestamp with time zone,
        updated_at timestamp with time zone
    )",
    "CREATE TABLE person (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        birth_date DATE,
        created_at timestamp with time zone,
        updated_at timestamp with time zone
    )",
    "CREATE TABLE genre_film_work (
        id TEXT PRIMARY KEY,
        film_work_id TEXT NOT NULL,
        genre_id TEXT NOT NULL,
        created_at timestamp with time zone
    )",
    "CREATE TABLE person_film_work (
        id TEXT PRIMARY KEY,
        film_work_id TEXT NOT NULL,
        person_id TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at timestamp with time zone
    )",
];

pub const CREATED: &str = "2021-06-16 20:14:09.221838+00";
pub const MODIFIED: &str = "2021-06-16 20:14:09.221855+00";

pub const FILM: &str = "3d825f60-9fff-4dfe-b294-1a45fa1e115d";
pub const ACTION: &str = "3d8d9bf5-0d90-4353-88ba-4ccc5d2c07ff";
pub const SCI_FI: &str = "6c162475-c7ed-4461-9184-001ef3d9f26e";
pub const PERSON: &str = "26e83050-29ef-4163-a99d-b546cac208f8";
pub const ACTION_LINK: &str = "0a2b0a8f-5a2b-4d53-8e6f-31c2e6a5d1b1";
pub const SCI_FI_LINK: &str = "b8b1f3a5-7e4c-4f0e-9f55-27a1d5c2b9d0";
pub const ACTOR_LINK: &str = "e3a5c0f9-4b8a-4f6e-a3c4-6d1e2b7f8a90";

/// 1 film work, 2 genres, 1 person, 2 genre links, 1 person link
pub async fn scenario() -> SourceDb {
    let source = SourceDb::new().await;
    source.film_work(FILM, "Star Wars: Episode IV", Some(8.6)).await;
    source.genre(ACTION, "Action").await;
    source.genre(SCI_FI, "Sci-Fi").await;
    source.person(PERSON, "Mark Hamill").await;
    source.genre_film_work(ACTION_LINK, FILM, ACTION).await;
    source.genre_film_work(SCI_FI_LINK, FILM, SCI_FI).await;
    source
        .person_film_work(ACTOR_LINK, FILM, PERSON, "actor")
        .await;
    source
}

/// A SQLite database file seeded through a writable connection
pub struct SourceDb {
    _dir: TempDir,
    path: PathBuf,
    pool: SqlitePool,
}

impl SourceDb {
    /// Empty database with the reference layout
    pub async fn new() -> Self {
        Self::with_schema(SOURCE_SCHEMA).await
    }

    pub async fn with_schema(statements: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.sqlite");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        let db = Self {
            _dir: dir,
            path,
            pool,
        };
        for statement in statements {
            db.execute(statement).await;
        }
        db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writable pool, for inspecting what was seeded
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn execute(&self, sql: &str) {
        sqlx::query(sql).execute(&self.pool).await.unwrap();
    }

    /// Read-only pool, as the migration opens it
    pub async fn open(&self) -> SqlitePool {
        open_sqlite(&self.path).await.unwrap()
    }

    pub async fn film_work(&self, id: &str, title: &str, rating: Option<f64>) {
        sqlx::query("INSERT INTO film_work VALUES (?1, ?2, NULL, ?3, NULL, NULL, ?4, 'movie', ?5, ?6)")
            .bind(id)
            .bind(title)
            .bind("2003-01-01")
            .bind(rating)
            .bind(CREATED)
            .bind(MODIFIED)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn genre(&self, id: &str, name: &str) {
        sqlx::query("INSERT INTO genre VALUES (?1, ?2, NULL, ?3, ?4)")
            .bind(id)
            .bind(name)
            .bind(CREATED)
            .bind(MODIFIED)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn person(&self, id: &str, full_name: &str) {
        sqlx::query("INSERT INTO person VALUES (?1, ?2, NULL, ?3, ?4)")
            .bind(id)
            .bind(full_name)
            .bind(CREATED)
            .bind(MODIFIED)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn genre_film_work(&self, id: &str, film_work_id: &str, genre_id: &str) {
        sqlx::query("INSERT INTO genre_film_work VALUES (?1, ?2, ?3, ?4)")
            .bind(id)
            .bind(film_work_id)
            .bind(genre_id)
            .bind(CREATED)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn person_film_work(&self, id: &str, film_work_id: &str, person_id: &str, role: &str) {
        sqlx::query("INSERT INTO person_film_work VALUES (?1, ?2, ?3, ?4, ?5)")
            .bind(id)
            .bind(film_work_id)
            .bind(person_id)
            .bind(role)
            .bind(CREATED)
            .execute(&self.pool)
            .await
            .unwrap();
    }
}

pub type Snapshot = BTreeMap<Table, BTreeMap<String, Row>>;

#[derive(Default)]
struct TargetState {
    tables: Snapshot,
    calls: Vec<(Table, usize)>,
    fail_on: Option<Table>,
}

/// In-memory target with `ON CONFLICT (id) DO NOTHING` semantics
///
/// Foreign keys of link tables are enforced per batch, and every upsert
/// call is recorded as `(table, rows)`.
#[derive(Clone, Default)]
pub struct MemoryTarget {
    state: Arc<Mutex<TargetState>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target that rejects every batch of `table`
    pub fn failing_on(table: Table) -> Self {
        let target = Self::new();
        target.state.lock().unwrap().fail_on = Some(table);
        target
    }

    pub fn count(&self, table: Table) -> usize {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(&table)
            .map_or(0, BTreeMap::len)
    }

    pub fn ids(&self, table: Table) -> BTreeSet<String> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(&table)
            .map(|rows| rows.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, table: Table, id: &str) -> Option<Row> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(&table)
            .and_then(|rows| rows.get(id).cloned())
    }

    pub fn calls(&self) -> Vec<(Table, usize)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().unwrap().tables.clone()
    }
}

impl Loader for MemoryTarget {
    async fn upsert(&self, table: Table, rows: &[Row]) -> Result<u64, BoxError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((table, rows.len()));

        if state.fail_on == Some(table) {
            return Err(format!("simulated failure writing {table}").into());
        }

        // The whole batch is rejected if any row breaks a constraint
        for row in rows {
            if row.id().is_none() {
                return Err(format!("row without id in {table}").into());
            }
            for (column, referenced) in table.references() {
                let id = row.get(column).and_then(Value::as_text).unwrap_or_default();
                let present = state
                    .tables
                    .get(referenced)
                    .is_some_and(|rows| rows.contains_key(id));
                if !present {
                    return Err(format!(
                        "insert or update on table \"{table}\" violates foreign key \"{column}\": \
                         {id} is not present in table \"{referenced}\""
                    )
                    .into());
                }
            }
        }

        let stored = state.tables.entry(table).or_default();
        let mut inserted = 0;
        for row in rows {
            let Some(id) = row.id() else { continue };
            if let Entry::Vacant(slot) = stored.entry(id.to_string()) {
                slot.insert(row.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
