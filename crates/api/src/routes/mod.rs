pub mod auth;
pub mod experiments;
pub mod feedback;
pub mod health;
pub mod quiz_scores;
pub mod scrape;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                   register (public)
/// /auth/login                                    login (public)
/// /auth/login/success                            current user (requires auth)
/// /auth/logout                                   logout (requires auth)
///
/// /experiments/{no}                              experiment content
/// /experiments/sentiment-analysis                CSV sentiment job (POST)
/// /experiments/sentiment-analysis/text           text sentiment job (POST)
/// /experiments/sentiment-analysis/text-multi     multi-entry sentiment job (POST)
/// /experiments/default-datasets                  list datasets (GET)
/// /experiments/run-topic-modeling                topic job on upload (POST)
/// /experiments/topic-modeling-default            topic job on dataset (POST)
/// /experiments/default-datasets-topic            list datasets (GET)
///
/// /feedback/experiment-feedback                  upsert own feedback (POST)
/// /feedback/experiment-feedback/{no}             own feedback (GET)
/// /feedback/experiment-feedback/{no}/all         all feedback (admin)
///
/// /quiz-scores                                   list own, submit (GET, POST)
/// /quiz-scores/experiment/{no}                   own scores for experiment
///
/// /scrape                                        scraper job (POST)
/// /scrape/twitter                                search and cache (POST)
/// /scrape/twitter-stored                         cached results (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/experiments", experiments::router())
        .nest("/feedback", feedback::router())
        .nest("/quiz-scores", quiz_scores::router())
        .nest("/scrape", scrape::router())
}
