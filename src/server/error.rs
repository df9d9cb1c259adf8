//! Mapping of service errors to HTTP responses.
//!
//! Clients get a status code and a short `{"error": ...}` body. The full error
//! chain only goes to the logs.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::pagination::PageParamError;
use crate::song_service::SongServiceError;

#[derive(Debug)]
pub enum ApiError {
    Service(SongServiceError),
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<SongServiceError> for ApiError {
    fn from(err: SongServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("invalid query: {}", rejection.body_text()))
    }
}

impl From<PageParamError> for ApiError {
    fn from(err: PageParamError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Service(err) => match err {
                SongServiceError::InvalidInput(message) => {
                    (StatusCode::BAD_REQUEST, message.clone())
                }
                SongServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "song not found".into()),
                SongServiceError::PageOutOfRange { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                SongServiceError::ExternalLookupFailed(_)
                | SongServiceError::ExternalResponseInvalid(_) => (
                    StatusCode::BAD_GATEWAY,
                    "failed to fetch song details".into(),
                ),
                SongServiceError::StorageFailure(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".into(),
                ),
                SongServiceError::Cancelled => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "server is shutting down".into(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            ApiError::Service(err) if status.is_server_error() => error!("{:#}", err),
            ApiError::Service(err) => warn!("{}", err),
            ApiError::BadRequest(message) => warn!("Bad request: {}", message),
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
