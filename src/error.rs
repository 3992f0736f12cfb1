use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::{ApiResponse, FieldError};

/// Everything a handler can fail with, mapped onto the shared envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("empty request body")]
    EmptyBody,
    #[error("malformed JSON body")]
    MalformedJson,
    #[error("{message}")]
    Validation { message: &'static str, errors: Vec<FieldError> },
    #[error("entry not found")]
    NotFound,
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(message: &'static str, errors: Vec<FieldError>) -> Self {
        Self::Validation { message, errors }
    }

    /// Wraps a lower-level failure with the client-facing operation context,
    /// e.g. `.map_err(ApiError::internal("Failed to create entry"))`.
    pub fn internal<E: Into<anyhow::Error>>(context: &'static str) -> impl FnOnce(E) -> Self {
        move |source| Self::Internal { context, source: source.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::EmptyBody => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail_with(
                    "Request body is empty. Please provide all required fields.",
                    vec![FieldError::new("body", "Request body cannot be empty")],
                ),
            ),
            ApiError::MalformedJson => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail_with(
                    "Invalid JSON format",
                    vec![FieldError::new("body", "Request body contains invalid JSON syntax")],
                ),
            ),
            ApiError::Validation { message, errors } => {
                (StatusCode::BAD_REQUEST, ApiResponse::fail_with(message, errors))
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, ApiResponse::fail("Entry not found")),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, ApiResponse::fail(message)),
            ApiError::Internal { context, source } => {
                tracing::error!(error = ?source, "{context}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::fail_with(
                        "Internal server error",
                        vec![FieldError::bare(context)],
                    ),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_taxonomy() {
        assert_eq!(ApiError::EmptyBody.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MalformedJson.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("An entry with this title already exists")
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal {
                context: "Failed to create entry",
                source: anyhow::anyhow!("boom"),
            }
            .into_response()
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
