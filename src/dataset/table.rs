//! The five tables of the movies catalogue and their target layout

use std::fmt;

/// A target column: its name, the PostgreSQL type its value is cast to,
/// and the source names it may appear under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub aliases: &'static [&'static str],
}

impl Column {
    const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self {
            name,
            sql_type,
            aliases: &[],
        }
    }

    const fn aliased(
        name: &'static str,
        sql_type: &'static str,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            sql_type,
            aliases,
        }
    }

    /// Source column names that resolve to this column, preferred first
    pub fn source_names(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

// The reference SQLite dump names its timestamps created_at/updated_at.
const CREATED: Column = Column::aliased("created", "timestamptz", &["created_at"]);
const MODIFIED: Column = Column::aliased("modified", "timestamptz", &["updated_at"]);

const FILM_WORK: &[Column] = &[
    Column::new("id", "uuid"),
    Column::new("title", "text"),
    Column::new("description", "text"),
    Column::new("creation_date", "date"),
    Column::new("certificate", "text"),
    Column::new("file_path", "text"),
    Column::new("rating", "float8"),
    Column::new("type", "text"),
    CREATED,
    MODIFIED,
];

const GENRE: &[Column] = &[
    Column::new("id", "uuid"),
    Column::new("name", "text"),
    Column::new("description", "text"),
    CREATED,
    MODIFIED,
];

const PERSON: &[Column] = &[
    Column::new("id", "uuid"),
    Column::new("full_name", "text"),
    Column::new("birth_date", "date"),
    CREATED,
    MODIFIED,
];

const GENRE_FILM_WORK: &[Column] = &[
    Column::new("id", "uuid"),
    Column::new("film_work_id", "uuid"),
    Column::new("genre_id", "uuid"),
    CREATED,
];

const PERSON_FILM_WORK: &[Column] = &[
    Column::new("id", "uuid"),
    Column::new("film_work_id", "uuid"),
    Column::new("person_id", "uuid"),
    Column::new("role", "text"),
    CREATED,
];

/// A logical table shared by the source and the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    FilmWork,
    Genre,
    Person,
    GenreFilmWork,
    PersonFilmWork,
}

impl Table {
    /// Write order on the target: entities before the links that reference them
    pub const LOAD_ORDER: [Table; 5] = [
        Table::FilmWork,
        Table::Genre,
        Table::Person,
        Table::GenreFilmWork,
        Table::PersonFilmWork,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::FilmWork => "film_work",
            Table::Genre => "genre",
            Table::Person => "person",
            Table::GenreFilmWork => "genre_film_work",
            Table::PersonFilmWork => "person_film_work",
        }
    }

    /// Target columns in the exact order they are written
    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::FilmWork => FILM_WORK,
            Table::Genre => GENRE,
            Table::Person => PERSON,
            Table::GenreFilmWork => GENRE_FILM_WORK,
            Table::PersonFilmWork => PERSON_FILM_WORK,
        }
    }

    /// Foreign-key columns and the table each one points at
    pub fn references(self) -> &'static [(&'static str, Table)] {
        match self {
            Table::GenreFilmWork => &[
                ("film_work_id", Table::FilmWork),
                ("genre_id", Table::Genre),
            ],
            Table::PersonFilmWork => &[
                ("film_work_id", Table::FilmWork),
                ("person_id", Table::Person),
            ],
            Table::FilmWork | Table::Genre | Table::Person => &[],
        }
    }

    pub fn is_link(self) -> bool {
        !self.references().is_empty()
    }

    /// Widest column count of any table
    pub fn max_columns() -> usize {
        Self::LOAD_ORDER
            .iter()
            .map(|table| table.columns().len())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn select_sql(self) -> &'static str {
        match self {
            Table::FilmWork => "SELECT * FROM film_work",
            Table::Genre => "SELECT * FROM genre",
            Table::Person => "SELECT * FROM person",
            Table::GenreFilmWork => "SELECT * FROM genre_film_work",
            Table::PersonFilmWork => "SELECT * FROM person_film_work",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
