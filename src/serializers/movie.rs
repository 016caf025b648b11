use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::entities::{actor, genre, movie};
use crate::error::CinemaResult;
use crate::ports::store::{CinemaStore, MovieChanges, NewMovie, RelationKind};
use crate::relations::{ensure_references_exist, set_related_fields};
use crate::serializers::fields::{MAX_CHAR_LENGTH, Payload, required};

/// A movie as clients read it, with its relations expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub actors: Vec<actor::Model>,
    pub genres: Vec<genre::Model>,
}

#[cfg(test)]
impl MovieDetail {
    pub fn actor_ids(&self) -> Vec<i64> {
        self.actors.iter().map(|a| a.id).collect()
    }

    pub fn genre_ids(&self) -> Vec<i64> {
        self.genres.iter().map(|g| g.id).collect()
    }
}

struct MovieInput {
    changes: MovieChanges,
    actors: Option<Vec<i64>>,
    genres: Option<Vec<i64>>,
}

pub struct MovieSerializer {
    store: Arc<dyn CinemaStore>,
}

impl MovieSerializer {
    pub fn new(store: Arc<dyn CinemaStore>) -> Self {
        Self { store }
    }

    fn validate(data: &Value, partial: bool) -> CinemaResult<MovieInput> {
        let mut payload = Payload::new(data, partial)?;
        let input = MovieInput {
            changes: MovieChanges {
                title: payload.char_field("title", Some(MAX_CHAR_LENGTH)),
                description: payload.char_field("description", None),
                duration: payload.non_negative_integer_field("duration"),
            },
            actors: payload.pk_list_field("actors"),
            genres: payload.pk_list_field("genres"),
        };
        payload.finish()?;
        Ok(input)
    }

    /// Every referenced id must exist before anything is written.
    async fn check_references(&self, input: &MovieInput) -> CinemaResult<()> {
        ensure_references_exist(
            self.store.as_ref(),
            RelationKind::Actors,
            input.actors.as_deref(),
        )
        .await?;
        ensure_references_exist(
            self.store.as_ref(),
            RelationKind::Genres,
            input.genres.as_deref(),
        )
        .await
    }

    async fn detail(&self, movie: movie::Model) -> CinemaResult<MovieDetail> {
        let actors = self.store.movie_actors(movie.id).await?;
        let genres = self.store.movie_genres(movie.id).await?;
        Ok(MovieDetail {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            duration: movie.duration,
            actors,
            genres,
        })
    }

    pub async fn list(&self) -> CinemaResult<Vec<MovieDetail>> {
        let movies = self.store.list_movies().await?;
        let mut details = Vec::with_capacity(movies.len());
        for movie in movies {
            details.push(self.detail(movie).await?);
        }
        Ok(details)
    }

    pub async fn retrieve(&self, id: i64) -> CinemaResult<MovieDetail> {
        let movie = self.store.get_movie(id).await?;
        self.detail(movie).await
    }

    pub async fn create(&self, data: &Value) -> CinemaResult<MovieDetail> {
        let input = Self::validate(data, false)?;
        self.check_references(&input).await?;

        let MovieInput {
            changes,
            actors,
            genres,
        } = input;
        let new_movie = NewMovie {
            title: required(changes.title, "title")?,
            description: required(changes.description, "description")?,
            duration: required(changes.duration, "duration")?,
        };

        let movie = self.store.create_movie(new_movie).await?;
        let actors = actors.unwrap_or_default();
        let genres = genres.unwrap_or_default();
        set_related_fields(
            self.store.as_ref(),
            movie.id,
            Some(actors.as_slice()),
            Some(genres.as_slice()),
        )
        .await?;

        self.detail(movie).await
    }

    /// Scalar fields follow patch semantics when `partial`; relation lists
    /// are replaced only when their key is present.
    pub async fn update(
        &self,
        id: i64,
        data: &Value,
        partial: bool,
    ) -> CinemaResult<MovieDetail> {
        self.store.get_movie(id).await?;
        let input = Self::validate(data, partial)?;
        self.check_references(&input).await?;

        let movie = self.store.update_movie(id, input.changes).await?;
        set_related_fields(
            self.store.as_ref(),
            movie.id,
            input.actors.as_deref(),
            input.genres.as_deref(),
        )
        .await?;

        self.detail(movie).await
    }

    pub async fn destroy(&self, id: i64) -> CinemaResult<()> {
        self.store.delete_movie(id).await
    }
}
