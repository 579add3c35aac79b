//! Route definitions for ticket configuration, listing and reservation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{reservation, ticket};
use crate::state::AppState;

/// ```text
/// POST   /admin/tickets                 -> ticket::create
/// GET    /stages/{id}/tickets           -> ticket::list_by_stage
/// POST   /tickets/{id}/reservations     -> reservation::reserve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/tickets", post(ticket::create))
        .route("/stages/{id}/tickets", get(ticket::list_by_stage))
        .route("/tickets/{id}/reservations", post(reservation::reserve))
}
