use std::sync::Arc;

use serde_json::Value;

use crate::entities::actor;
use crate::error::CinemaResult;
use crate::ports::store::{ActorChanges, CinemaStore, NewActor};
use crate::serializers::fields::{MAX_CHAR_LENGTH, Payload, required};

pub struct ActorSerializer {
    store: Arc<dyn CinemaStore>,
}

impl ActorSerializer {
    pub fn new(store: Arc<dyn CinemaStore>) -> Self {
        Self { store }
    }

    fn validate(data: &Value, partial: bool) -> CinemaResult<ActorChanges> {
        let mut payload = Payload::new(data, partial)?;
        let changes = ActorChanges {
            first_name: payload.char_field("first_name", Some(MAX_CHAR_LENGTH)),
            last_name: payload.char_field("last_name", Some(MAX_CHAR_LENGTH)),
        };
        payload.finish()?;
        Ok(changes)
    }

    pub async fn list(&self) -> CinemaResult<Vec<actor::Model>> {
        self.store.list_actors().await
    }

    pub async fn retrieve(&self, id: i64) -> CinemaResult<actor::Model> {
        self.store.get_actor(id).await
    }

    pub async fn create(&self, data: &Value) -> CinemaResult<actor::Model> {
        let changes = Self::validate(data, false)?;
        let actor = NewActor {
            first_name: required(changes.first_name, "first_name")?,
            last_name: required(changes.last_name, "last_name")?,
        };
        self.store.create_actor(actor).await
    }

    pub async fn update(
        &self,
        id: i64,
        data: &Value,
        partial: bool,
    ) -> CinemaResult<actor::Model> {
        self.store.get_actor(id).await?;
        let changes = Self::validate(data, partial)?;
        self.store.update_actor(id, changes).await
    }

    pub async fn destroy(&self, id: i64) -> CinemaResult<()> {
        self.store.delete_actor(id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::CinemaError;
    use crate::test_utils::test_db;

    #[tokio::test]
    async fn test_create_actor() {
        let serializer = ActorSerializer::new(test_db().await);
        let actor = serializer
            .create(&json!({"first_name": "Jane", "last_name": "Doe"}))
            .await
            .unwrap();

        assert_eq!(actor.id, 1);
        assert_eq!(actor.to_string(), "Jane Doe");
        assert_eq!(
            serde_json::to_value(&actor).unwrap(),
            json!({"id": 1, "first_name": "Jane", "last_name": "Doe"})
        );
    }

    #[tokio::test]
    async fn test_create_actor_requires_both_names() {
        let db = test_db().await;
        let serializer = ActorSerializer::new(db.clone());
        let result = serializer.create(&json!({"first_name": "Jane"})).await;

        let Err(CinemaError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert!(errors.field("last_name").is_some());
        assert!(errors.field("first_name").is_none());
        assert!(serializer.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_name() {
        let serializer = ActorSerializer::new(test_db().await);
        let actor = serializer
            .create(&json!({"first_name": "Jane", "last_name": "Doe"}))
            .await
            .unwrap();

        let updated = serializer
            .update(actor.id, &json!({"last_name": "Smith"}), true)
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Jane");
        assert_eq!(updated.last_name, "Smith");
    }

    #[tokio::test]
    async fn test_full_update_requires_every_field() {
        let serializer = ActorSerializer::new(test_db().await);
        let actor = serializer
            .create(&json!({"first_name": "Jane", "last_name": "Doe"}))
            .await
            .unwrap();

        let result = serializer
            .update(actor.id, &json!({"last_name": "Smith"}), false)
            .await;
        assert!(matches!(result, Err(CinemaError::Validation(_))));
        assert_eq!(
            serializer.retrieve(actor.id).await.unwrap().last_name,
            "Doe"
        );
    }

    #[tokio::test]
    async fn test_update_missing_actor() {
        let serializer = ActorSerializer::new(test_db().await);
        let result = serializer
            .update(5, &json!({"first_name": "Nobody"}), true)
            .await;
        assert!(matches!(result, Err(CinemaError::NotFound { id: 5, .. })));
    }
}
