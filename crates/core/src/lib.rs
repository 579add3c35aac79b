//! Festago ticketing domain.
//!
//! Pure business logic for ticket configuration, reservation sequencing,
//! entry-time allocation and entry codes. Persistence lives in
//! `festago_db`; the HTTP surface lives in `festago_api`.

pub mod clock;
pub mod entry_code;
pub mod error;
pub mod ledger;
pub mod member_ticket;
pub mod pagination;
pub mod roles;
pub mod stage;
pub mod ticket;
pub mod types;
