//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role (staff and gate).
//! - [`rbac::RequireMember`] -- Requires the `member` role.

pub mod auth;
pub mod rbac;
