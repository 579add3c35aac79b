//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or a `&mut PgConnection` when the call must run
//! inside a caller-owned transaction) as the first argument.

pub mod member_repo;
pub mod member_ticket_repo;
pub mod stage_repo;
pub mod ticket_repo;

pub use member_repo::MemberRepo;
pub use member_ticket_repo::MemberTicketRepo;
pub use stage_repo::StageRepo;
pub use ticket_repo::TicketRepo;
