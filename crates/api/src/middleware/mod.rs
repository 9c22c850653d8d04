//! Request extractors enforcing authentication and roles.
//!
//! - [`auth::AuthUser`] -- the caller identified by a Bearer token.
//! - [`rbac::RequireAdmin`] -- an authenticated caller with the `admin` role.

pub mod auth;
pub mod rbac;
