//! Public, read-only view of the idea catalog.

use axum::extract::State;
use ideaforge_core::error::CoreError;
use ideaforge_core::idea::{Category, IdeaRecord};
use ideaforge_db::repositories::IdeaRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::query::{clamp_limit, clamp_offset, CatalogParams, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/catalog
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<DataResponse<Vec<IdeaRecord>>>> {
    let category = params
        .category
        .as_deref()
        .map(|label| {
            Category::from_label(label).ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown category '{label}'. Must be one of: {}",
                    Category::labels()
                ))
            })
        })
        .transpose()?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let ideas = IdeaRepo::list(&state.pool, category, limit, offset).await?;
    Ok(Json(DataResponse {
        data: ideas.into_iter().map(|i| i.into_record()).collect(),
    }))
}

/// GET /api/v1/catalog/{name}
pub async fn get_catalog_entry(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<IdeaRecord>>> {
    let idea = IdeaRepo::find_by_name(&state.pool, &name)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(DataResponse {
        data: idea.into_record(),
    }))
}
