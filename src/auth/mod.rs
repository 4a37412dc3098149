//! Bearer-token identity for incoming requests.
//!
//! Accounts themselves are managed elsewhere; this module only turns an
//! `Authorization` header into a known user or the anonymous caller.

pub mod jwt;
pub mod middleware;

pub use middleware::{AdminUser, AuthUser, CurrentUser};
