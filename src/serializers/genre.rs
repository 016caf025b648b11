use std::sync::Arc;

use serde_json::Value;

use crate::entities::genre;
use crate::error::CinemaResult;
use crate::ports::store::{CinemaStore, GenreChanges, NewGenre};
use crate::serializers::fields::{MAX_CHAR_LENGTH, Payload, required};

pub struct GenreSerializer {
    store: Arc<dyn CinemaStore>,
}

impl GenreSerializer {
    pub fn new(store: Arc<dyn CinemaStore>) -> Self {
        Self { store }
    }

    fn validate(data: &Value, partial: bool) -> CinemaResult<GenreChanges> {
        let mut payload = Payload::new(data, partial)?;
        let changes = GenreChanges {
            name: payload.char_field("name", Some(MAX_CHAR_LENGTH)),
        };
        payload.finish()?;
        Ok(changes)
    }

    pub async fn list(&self) -> CinemaResult<Vec<genre::Model>> {
        self.store.list_genres().await
    }

    pub async fn retrieve(&self, id: i64) -> CinemaResult<genre::Model> {
        self.store.get_genre(id).await
    }

    /// Name uniqueness is left to the store.
    pub async fn create(&self, data: &Value) -> CinemaResult<genre::Model> {
        let changes = Self::validate(data, false)?;
        let genre = NewGenre {
            name: required(changes.name, "name")?,
        };
        self.store.create_genre(genre).await
    }

    pub async fn update(
        &self,
        id: i64,
        data: &Value,
        partial: bool,
    ) -> CinemaResult<genre::Model> {
        self.store.get_genre(id).await?;
        let changes = Self::validate(data, partial)?;
        self.store.update_genre(id, changes).await
    }

    pub async fn destroy(&self, id: i64) -> CinemaResult<()> {
        self.store.delete_genre(id).await
    }
}
