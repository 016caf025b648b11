use std::sync::Arc;

use crate::database::Database;

pub async fn test_db() -> Arc<Database> {
    Arc::new(
        Database::in_memory()
            .await
            .unwrap_or_else(|e| panic!("Failed to create test database: {e:?}")),
    )
}
