//! Helpers folding axum's extractor rejections into [`ServiceError`].
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (or the `Path` equivalent)
//! and pass it through these functions, so malformed input answers with the
//! same `{"error": ...}` 400 body as any other validation failure.

use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::{JsonRejection, PathRejection};

use crate::error::ServiceError;

pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| ServiceError::Validation(err.body_text()))
}

pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, ServiceError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| ServiceError::Validation(err.body_text()))
}
