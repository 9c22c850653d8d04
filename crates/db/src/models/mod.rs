//! Row structs and DTOs.
//!
//! Each submodule pairs a `FromRow` entity struct with the DTOs used to
//! write it.

pub mod experiment;
pub mod feedback;
pub mod quiz_score;
pub mod twitter_query;
pub mod user;
