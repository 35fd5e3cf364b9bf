pub mod admin;
pub mod billing;
pub mod catalog;
pub mod health;
pub mod ideas;
pub mod me;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ideas/generate                      generate an idea (auth)
/// /me/quota                            caller's quota (auth)
/// /billing/checkout-session            start a checkout (auth)
/// /catalog                             public catalog (public)
/// /admin/creators                      grant creator claim (admin)
/// /admin/users/{id}/subscription       set subscription tier (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/ideas", ideas::router())
        .nest("/me", me::router())
        .nest("/billing", billing::router())
        .merge(catalog::router())
        .nest("/admin", admin::router())
}
