use axum::routing::post;
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/billing`.
pub fn router() -> Router<AppState> {
    Router::new().route("/checkout-session", post(billing::create_checkout_session))
}
