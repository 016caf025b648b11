use std::fmt;

use crate::entities::{actor, cinema_hall, genre, movie};
use crate::error::CinemaResult;

/// The two many-to-many relations a movie carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Actors,
    Genres,
}

impl RelationKind {
    /// Payload key the relation is read from and reported under.
    pub fn field(self) -> &'static str {
        match self {
            RelationKind::Actors => "actors",
            RelationKind::Genres => "genres",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGenre {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreChanges {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCinemaHall {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CinemaHallChanges {
    pub name: Option<String>,
    pub rows: Option<i32>,
    pub seats_in_row: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub duration: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
}

/// Port trait over the persistent store of cinema records.
///
/// The production implementation lives on `database::Database`; tests use
/// either an in-memory SQLite `Database` or the generated mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CinemaStore: Send + Sync {
    async fn list_actors(&self) -> CinemaResult<Vec<actor::Model>>;

    async fn get_actor(&self, id: i64) -> CinemaResult<actor::Model>;

    async fn create_actor(&self, actor: NewActor) -> CinemaResult<actor::Model>;

    async fn update_actor(&self, id: i64, changes: ActorChanges) -> CinemaResult<actor::Model>;

    async fn delete_actor(&self, id: i64) -> CinemaResult<()>;

    async fn list_genres(&self) -> CinemaResult<Vec<genre::Model>>;

    async fn get_genre(&self, id: i64) -> CinemaResult<genre::Model>;

    /// Fails with `UniquenessViolation` when the name is taken.
    async fn create_genre(&self, genre: NewGenre) -> CinemaResult<genre::Model>;

    async fn update_genre(&self, id: i64, changes: GenreChanges) -> CinemaResult<genre::Model>;

    async fn delete_genre(&self, id: i64) -> CinemaResult<()>;

    async fn list_cinema_halls(&self) -> CinemaResult<Vec<cinema_hall::Model>>;

    async fn get_cinema_hall(&self, id: i64) -> CinemaResult<cinema_hall::Model>;

    async fn create_cinema_hall(&self, hall: NewCinemaHall) -> CinemaResult<cinema_hall::Model>;

    async fn update_cinema_hall(
        &self,
        id: i64,
        changes: CinemaHallChanges,
    ) -> CinemaResult<cinema_hall::Model>;

    async fn delete_cinema_hall(&self, id: i64) -> CinemaResult<()>;

    async fn list_movies(&self) -> CinemaResult<Vec<movie::Model>>;

    async fn get_movie(&self, id: i64) -> CinemaResult<movie::Model>;

    async fn create_movie(&self, movie: NewMovie) -> CinemaResult<movie::Model>;

    async fn update_movie(&self, id: i64, changes: MovieChanges) -> CinemaResult<movie::Model>;

    async fn delete_movie(&self, id: i64) -> CinemaResult<()>;

    /// Actors associated with the movie, ordered by id.
    async fn movie_actors(&self, movie_id: i64) -> CinemaResult<Vec<actor::Model>>;

    /// Genres associated with the movie, ordered by id.
    async fn movie_genres(&self, movie_id: i64) -> CinemaResult<Vec<genre::Model>>;

    /// The subset of `ids` with no matching actor/genre row, deduplicated,
    /// in input order.
    async fn missing_ids(&self, kind: RelationKind, ids: &[i64]) -> CinemaResult<Vec<i64>>;

    /// Replace every association row of `kind` for the movie so the set of
    /// linked ids becomes exactly `ids`.
    async fn set_associations(
        &self,
        movie_id: i64,
        kind: RelationKind,
        ids: &[i64],
    ) -> CinemaResult<()>;
}
