use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::entities::cinema_hall;
use crate::http_server::error::{ApiResult, IdPath, JsonBody};
use crate::http_server::state::AppState;

pub async fn list_cinema_halls(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<cinema_hall::Model>>> {
    Ok(Json(app_state.cinema_halls().list().await?))
}

pub async fn create_cinema_hall(
    State(app_state): State<Arc<AppState>>,
    JsonBody(data): JsonBody,
) -> ApiResult<(StatusCode, Json<cinema_hall::Model>)> {
    let cinema_hall = app_state.cinema_halls().create(&data).await?;
    Ok((StatusCode::CREATED, Json(cinema_hall)))
}

pub async fn retrieve_cinema_hall(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<cinema_hall::Model>> {
    Ok(Json(app_state.cinema_halls().retrieve(id).await?))
}

pub async fn update_cinema_hall(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<cinema_hall::Model>> {
    Ok(Json(app_state.cinema_halls().update(id, &data, false).await?))
}

pub async fn partial_update_cinema_hall(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<cinema_hall::Model>> {
    Ok(Json(app_state.cinema_halls().update(id, &data, true).await?))
}

pub async fn destroy_cinema_hall(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    app_state.cinema_halls().destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
