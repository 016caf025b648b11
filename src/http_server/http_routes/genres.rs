use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::entities::genre;
use crate::http_server::error::{ApiResult, IdPath, JsonBody};
use crate::http_server::state::AppState;

pub async fn list_genres(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<genre::Model>>> {
    Ok(Json(app_state.genres().list().await?))
}

pub async fn create_genre(
    State(app_state): State<Arc<AppState>>,
    JsonBody(data): JsonBody,
) -> ApiResult<(StatusCode, Json<genre::Model>)> {
    let genre = app_state.genres().create(&data).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub async fn retrieve_genre(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<genre::Model>> {
    Ok(Json(app_state.genres().retrieve(id).await?))
}

pub async fn update_genre(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<genre::Model>> {
    Ok(Json(app_state.genres().update(id, &data, false).await?))
}

pub async fn partial_update_genre(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<genre::Model>> {
    Ok(Json(app_state.genres().update(id, &data, true).await?))
}

pub async fn destroy_genre(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    app_state.genres().destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
