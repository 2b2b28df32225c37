// Conversion of domain errors into HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::auth::AuthError;
use crate::error::ServiceError;
use crate::search::SearchError;

const INTERNAL_MESSAGE: &str = "internal server error";

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => {
                error_response(StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::SigningFailure(msg) => {
                error!("Token signing failed: {}", msg);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(detail) => {
                error!("Request failed: {}", detail);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE);
            }
        };
        error_response(status, self.to_string())
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        match self {
            SearchError::EmptyQuery => error_response(StatusCode::BAD_REQUEST, self.to_string()),
            SearchError::FetchError(_) | SearchError::ParseError(_) => {
                error!("{}", self);
                error_response(StatusCode::BAD_GATEWAY, "book search unavailable")
            }
        }
    }
}
