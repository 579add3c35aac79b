use axum::routing::post;
use axum::Router;

use crate::handlers::entry;
use crate::state::AppState;

/// Routes mounted at `/staff`.
pub fn router() -> Router<AppState> {
    Router::new().route("/entry-codes/validation", post(entry::validate))
}
