//! Route definitions for the `/admin` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by the core policy).
///
/// ```text
/// POST /creators                  -> set_creator_role
/// PUT  /users/{id}/subscription   -> update_subscription
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/creators", post(admin::set_creator_role))
        .route("/users/{id}/subscription", put(admin::update_subscription))
}
