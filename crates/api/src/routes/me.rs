use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET /quota  -> get_quota
/// GET /claims -> get_claims
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quota", get(me::get_quota))
        .route("/claims", get(me::get_claims))
}
