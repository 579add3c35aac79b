pub mod entry;
pub mod member_ticket;
pub mod reservation;
pub mod ticket;
