use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::http_server::error::{ApiResult, IdPath, JsonBody};
use crate::http_server::state::AppState;
use crate::serializers::MovieDetail;

pub async fn list_movies(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MovieDetail>>> {
    Ok(Json(app_state.movies().list().await?))
}

/// Body: `{title, description, duration, actors?: [id], genres?: [id]}`
pub async fn create_movie(
    State(app_state): State<Arc<AppState>>,
    JsonBody(data): JsonBody,
) -> ApiResult<(StatusCode, Json<MovieDetail>)> {
    let movie = app_state.movies().create(&data).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn retrieve_movie(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<MovieDetail>> {
    Ok(Json(app_state.movies().retrieve(id).await?))
}

pub async fn update_movie(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<MovieDetail>> {
    Ok(Json(app_state.movies().update(id, &data, false).await?))
}

/// Relation keys left out of the body keep their current associations.
pub async fn partial_update_movie(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(data): JsonBody,
) -> ApiResult<Json<MovieDetail>> {
    Ok(Json(app_state.movies().update(id, &data, true).await?))
}

pub async fn destroy_movie(
    State(app_state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    app_state.movies().destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
