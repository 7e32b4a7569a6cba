//! The extracted dataset handed from extractor to loader

use super::{Batches, Extractor};
use crate::dataset::Table;
use crate::error::ReadError;

/// One lazy batch sequence per table
///
/// Each sequence is single-pass. The bundle is consumed as a whole by
/// [`DatasetBundle::into_load_order`], which fixes the order the target
/// sees the tables in.
pub struct DatasetBundle<'a> {
    pub film_works: Batches<'a>,
    pub genres: Batches<'a>,
    pub persons: Batches<'a>,
    pub genre_film_works: Batches<'a>,
    pub person_film_works: Batches<'a>,
}

impl<'a> DatasetBundle<'a> {
    /// Open all five tables of the source
    ///
    /// Nothing is read beyond what each table needs to be opened, but a
    /// table that cannot be opened fails the whole bundle before any row
    /// is written anywhere.
    ///
    /// # Errors
    /// Returns the [`ReadError`] of the first table that cannot be opened.
    pub async fn extract<E: Extractor>(extractor: &'a E) -> Result<Self, ReadError> {
        log::debug!("Opening source tables");
        Ok(Self {
            film_works: extractor.extract(Table::FilmWork).await?,
            genres: extractor.extract(Table::Genre).await?,
            persons: extractor.extract(Table::Person).await?,
            genre_film_works: extractor.extract(Table::GenreFilmWork).await?,
            person_film_works: extractor.extract(Table::PersonFilmWork).await?,
        })
    }

    /// The five sequences in [`Table::LOAD_ORDER`]
    pub fn into_load_order(self) -> [Batches<'a>; 5] {
        [
            self.film_works,
            self.genres,
            self.persons,
            self.genre_film_works,
            self.person_film_works,
        ]
    }
}
