pub mod analysis;
pub mod auth;
pub mod experiments;
pub mod feedback;
pub mod quiz_scores;
pub mod scrape;
