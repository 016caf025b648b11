use std::sync::Arc;

use serde_json::Value;

use crate::entities::cinema_hall;
use crate::error::CinemaResult;
use crate::ports::store::{CinemaHallChanges, CinemaStore, NewCinemaHall};
use crate::serializers::fields::{MAX_CHAR_LENGTH, Payload, required};

pub struct CinemaHallSerializer {
    store: Arc<dyn CinemaStore>,
}

impl CinemaHallSerializer {
    pub fn new(store: Arc<dyn CinemaStore>) -> Self {
        Self { store }
    }

    fn validate(data: &Value, partial: bool) -> CinemaResult<CinemaHallChanges> {
        let mut payload = Payload::new(data, partial)?;
        let changes = CinemaHallChanges {
            name: payload.char_field("name", Some(MAX_CHAR_LENGTH)),
            rows: payload.non_negative_integer_field("rows"),
            seats_in_row: payload.non_negative_integer_field("seats_in_row"),
        };
        payload.finish()?;
        Ok(changes)
    }

    pub async fn list(&self) -> CinemaResult<Vec<cinema_hall::Model>> {
        self.store.list_cinema_halls().await
    }

    pub async fn retrieve(&self, id: i64) -> CinemaResult<cinema_hall::Model> {
        self.store.get_cinema_hall(id).await
    }

    pub async fn create(&self, data: &Value) -> CinemaResult<cinema_hall::Model> {
        let changes = Self::validate(data, false)?;
        let hall = NewCinemaHall {
            name: required(changes.name, "name")?,
            rows: required(changes.rows, "rows")?,
            seats_in_row: required(changes.seats_in_row, "seats_in_row")?,
        };
        self.store.create_cinema_hall(hall).await
    }

    pub async fn update(
        &self,
        id: i64,
        data: &Value,
        partial: bool,
    ) -> CinemaResult<cinema_hall::Model> {
        self.store.get_cinema_hall(id).await?;
        let changes = Self::validate(data, partial)?;
        self.store.update_cinema_hall(id, changes).await
    }

    pub async fn destroy(&self, id: i64) -> CinemaResult<()> {
        self.store.delete_cinema_hall(id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::CinemaError;
    use crate::ports::store::MockCinemaStore;
    use crate::test_utils::test_db;

    #[tokio::test]
    async fn test_create_hall_with_string_integers() {
        let serializer = CinemaHallSerializer::new(test_db().await);
        let hall = serializer
            .create(&json!({"name": "Red", "rows": "12", "seats_in_row": 20}))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&hall).unwrap(),
            json!({"id": 1, "name": "Red", "rows": 12, "seats_in_row": 20})
        );
    }

    #[tokio::test]
    async fn test_invalid_hall_never_reaches_store() {
        // The mock has no expectations, so any store call panics.
        let serializer = CinemaHallSerializer::new(Arc::new(MockCinemaStore::new()));
        let result = serializer
            .create(&json!({"name": "Red", "rows": -1, "seats_in_row": "many"}))
            .await;

        let Err(CinemaError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert!(errors.field("rows").is_some());
        assert!(errors.field("seats_in_row").is_some());
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_rows() {
        let serializer = CinemaHallSerializer::new(test_db().await);
        let hall = serializer
            .create(&json!({"name": "Red", "rows": 12, "seats_in_row": 20}))
            .await
            .unwrap();

        let updated = serializer
            .update(hall.id, &json!({"rows": 0}), true)
            .await
            .unwrap();
        assert_eq!(updated.rows, 0);
        assert_eq!(updated.seats_in_row, 20);
        assert_eq!(updated.name, "Red");
    }
}
