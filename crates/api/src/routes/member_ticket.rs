//! Route definitions for the `/member-tickets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::member_ticket;
use crate::state::AppState;

/// Routes mounted at `/member-tickets`.
///
/// ```text
/// GET    /                  -> list
/// GET    /current           -> current
/// GET    /{id}              -> get_by_id
/// POST   /{id}/entry-code   -> issue_entry_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(member_ticket::list))
        .route("/current", get(member_ticket::current))
        .route("/{id}", get(member_ticket::get_by_id))
        .route("/{id}/entry-code", post(member_ticket::issue_entry_code))
}
