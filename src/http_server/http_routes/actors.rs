use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::entities::actor;
use crate::http_server::error::{ApiResult, IdPath, JsonBody};
use crate::http_server::state::AppState;

pub async fn list_actors(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<actor::Model>>> {
    Ok(Json(app_state.actors().list().await?))
}

pub async fn create_actor(
    State(app_state): State<Arc<AppState>>,
    JsonBody(data): JsonBody,
) -> ApiResult<(StatusCode, Json<actor::Model>)> {
    let actor = app_state.actors().create(&data).await?;
    Ok((StatusCode::CREATED, Json(actor)))
}

pub async fn retrieve_actor(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<actor::Model>> {
    Ok(Json(app_state.actors().retrieve(id).await?))
}

pub async fn update_actor(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<actor::Model>> {
    Ok(Json(app_state.actors().update(id, &data, false).await?))
}

pub async fn partial_update_actor(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<actor::Model>> {
    Ok(Json(app_state.actors().update(id, &data, true).await?))
}

pub async fn destroy_actor(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    app_state.actors().destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
