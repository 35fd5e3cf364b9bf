//! Handler for user-triggered idea generation.

use axum::extract::State;
use ideaforge_core::error::CoreError;
use ideaforge_core::idea::IdeaRecord;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /ideas/generate`.
///
/// `prompt` is kept untyped so a non-string value is reported as
/// `invalid-argument` rather than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct GenerateIdeaRequest {
    pub prompt: Option<serde_json::Value>,
}

/// POST /api/v1/ideas/generate
pub async fn generate_idea(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(input): Json<GenerateIdeaRequest>,
) -> AppResult<Json<DataResponse<IdeaRecord>>> {
    let prompt = input
        .prompt
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| {
            CoreError::Validation(
                "The function must be called with a non-empty 'prompt' argument.".into(),
            )
        })?;

    let record = state.generator.generate(Some(&caller), prompt).await?;
    Ok(Json(DataResponse { data: record }))
}
