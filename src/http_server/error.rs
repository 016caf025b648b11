use axum::{
    Json,
    body::Body,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::{Response, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::CinemaError;

/// Every failure a handler can produce.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Cinema(#[from] CinemaError),
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Path(#[from] PathRejection),
}

/// A JSON request body whose rejections render like every other API error.
#[derive(FromRequest, Deserialize)]
#[from_request(via(axum::Json), rejection(ApiError))]
#[serde(transparent)]
pub struct JsonBody(pub Value);

/// The `{id}` path segment, rejected as `{"detail": ...}` when it isn't an integer.
#[derive(FromRequestParts, Deserialize)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
#[serde(transparent)]
pub struct IdPath(pub i64);

// A generic error report
// Produced via `Err(some_err).wrap_err("Some context")`
// or `Err(color_eyre::eyre::Report::new(SomeError))`
pub struct Report(color_eyre::Report);

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<E> From<E> for Report
where
    E: Into<color_eyre::Report>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

impl IntoResponse for CinemaError {
    fn into_response(self) -> Response<Body> {
        if let Some(errors) = self.field_errors() {
            log::debug!("Rejected request: {}", self);
            return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
        }

        match self {
            CinemaError::NotFound { entity, id } => {
                log::debug!("{} {} not found", entity, id);
                detail(StatusCode::NOT_FOUND, "Not found.")
            }
            err => {
                log::error!("{err:?}");
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response<Body> {
        match self {
            ApiError::Cinema(err) => err.into_response(),
            ApiError::Json(rejection) => {
                log::debug!("Rejected request body: {}", rejection.body_text());
                detail(rejection.status(), rejection.body_text())
            }
            ApiError::Path(rejection) => {
                log::debug!("Rejected request path: {}", rejection.body_text());
                detail(rejection.status(), rejection.body_text())
            }
        }
    }
}

impl IntoResponse for Report {
    fn into_response(self) -> Response<Body> {
        match self.0.downcast::<CinemaError>() {
            Ok(err) => err.into_response(),
            Err(err) => {
                log::error!("{err:?}");
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use color_eyre::eyre::{WrapErr, eyre};

    use super::*;

    #[test]
    fn test_report_with_cinema_error_keeps_its_status() {
        let result: Result<(), CinemaError> = Err(CinemaError::not_found("movie", 4));
        let report = Report::from(result.wrap_err("Failed to load movie").unwrap_err());

        assert_eq!(report.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_report_is_internal_error() {
        let report = Report::from(eyre!("database went away"));
        assert_eq!(
            report.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
