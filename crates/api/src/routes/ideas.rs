use axum::routing::post;
use axum::Router;

use crate::handlers::ideas;
use crate::state::AppState;

/// Routes mounted at `/ideas`.
///
/// ```text
/// POST /generate -> generate_idea
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(ideas::generate_idea))
}
