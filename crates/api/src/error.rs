use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ideaforge_core::error::CoreError;
use serde_json::json;

/// Message returned for every internal failure; details go to the log.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every response body is `{ "error": <message>, "code": <kind> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Undecodable bodies are `invalid-argument`. The parser's text is logged,
/// never returned.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), detail = %rejection.body_text(), "Rejected request body");
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Request body must be sent with Content-Type: application/json"
            }
            _ => "Request body must be a valid JSON object",
        };
        AppError::BadRequest(message.into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected path parameters");
        AppError::BadRequest("Invalid path parameter".into())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected query string");
        AppError::BadRequest("Invalid query parameters".into())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid-argument", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Map a domain error to status, kind tag and caller-visible message.
///
/// Upstream failures keep their kind but never echo backend text.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "not-found",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "invalid-argument", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "permission-denied", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
        CoreError::QuotaExhausted => (
            StatusCode::TOO_MANY_REQUESTS,
            "QuotaExhausted",
            "You have used all of your free generations. Upgrade to keep generating.".to_string(),
        ),
        CoreError::MalformedResponse(detail) => {
            tracing::warn!(detail = %detail, "Malformed generation response");
            (
                StatusCode::BAD_GATEWAY,
                "MalformedResponse",
                "The generation service returned an unreadable response".to_string(),
            )
        }
        CoreError::InvalidRecord { field, reason } => {
            tracing::warn!(field = %field, reason = %reason, "Invalid generation record");
            (
                StatusCode::BAD_GATEWAY,
                "InvalidRecord",
                format!("The generated idea failed validation on field `{field}`"),
            )
        }
        CoreError::GenerationUnavailable(detail) => {
            tracing::warn!(detail = %detail, "Generation backend unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "GenerationUnavailable",
                "The generation service is unavailable. Please try again later.".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "not-found",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "already-exists",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
