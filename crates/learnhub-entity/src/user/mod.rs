//! User domain types.
//!
//! LearnHub delegates identity to an external auth provider. There is no
//! local users table; the authenticated user id and role arrive in the
//! access token and flow through the request context.

pub mod role;

pub use role::UserRole;
