//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing and password policy.
//! - [`jwt`] -- stateless HS256 access tokens.

pub mod jwt;
pub mod password;
