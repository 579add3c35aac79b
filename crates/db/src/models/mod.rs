//! Row structs and create DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, a `Deserialize` create DTO where inserts come from the API, and the
//! conversion into the corresponding `festago_core` domain type.

pub mod member;
pub mod member_ticket;
pub mod stage;
pub mod ticket;
