use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// The public catalog listing. No authentication required.
///
/// ```text
/// GET /catalog        -> list_catalog
/// GET /catalog/{name} -> get_catalog_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::list_catalog))
        .route("/catalog/{name}", get(catalog::get_catalog_entry))
}
