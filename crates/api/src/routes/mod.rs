pub mod entry;
pub mod health;
pub mod member_ticket;
pub mod ticket;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// POST   /admin/tickets                       add entry-time slot (admin)
/// GET    /stages/{id}/tickets                 stage tickets (public)
/// POST   /tickets/{id}/reservations           reserve (member)
///
/// GET    /member-tickets                      list, paged (member)
/// GET    /member-tickets/current              usable tickets (member)
/// GET    /member-tickets/{id}                 get_by_id (member)
/// POST   /member-tickets/{id}/entry-code      issue entry code (member)
///
/// POST   /staff/entry-codes/validation        admit at the gate (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(ticket::router())
        .nest("/member-tickets", member_ticket::router())
        .nest("/staff", entry::router())
}
