use crate::types::DbId;

/// Domain error taxonomy shared by every service in the workspace.
///
/// The HTTP layer maps each variant to a caller-visible kind tag; see
/// `ideaforge_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Free-tier allowance is used up (or was lost to a concurrent request).
    #[error("Generation quota exhausted")]
    QuotaExhausted,

    /// The generation backend returned text that is not a JSON object.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The response parsed but a field is missing, mistyped, or out of range.
    #[error("Invalid record: field `{field}` {reason}")]
    InvalidRecord { field: String, reason: String },

    /// The generation backend failed or timed out.
    #[error("Generation backend unavailable: {0}")]
    GenerationUnavailable(String),
}
