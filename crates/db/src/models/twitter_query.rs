//! Cached Twitter search results.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use vlab_core::scrape::Tweet;
use vlab_core::types::{DbId, Timestamp};

/// Tweets fetched for one query string. The first stored result for a
/// query is served for every later request.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TwitterQuery {
    pub id: DbId,
    pub query: String,
    pub tweets: Json<Vec<Tweet>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
