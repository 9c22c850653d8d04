//! Virtual lab domain logic.
//!
//! Everything in this crate is free of database and HTTP concerns: the
//! external job layer under [`jobs`], plus the request validators and
//! work-area helpers that surround it.

pub mod datasets;
pub mod error;
pub mod experiment;
pub mod feedback;
pub mod jobs;
pub mod quiz;
pub mod roles;
pub mod scrape;
pub mod sentiment;
pub mod topic;
pub mod types;
pub mod uploads;
