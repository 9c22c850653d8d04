//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod experiment_repo;
pub mod feedback_repo;
pub mod quiz_score_repo;
pub mod twitter_query_repo;
pub mod user_repo;

pub use experiment_repo::ExperimentRepo;
pub use feedback_repo::FeedbackRepo;
pub use quiz_score_repo::QuizScoreRepo;
pub use twitter_query_repo::TwitterQueryRepo;
pub use user_repo::UserRepo;
