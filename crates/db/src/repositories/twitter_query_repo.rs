//! Repository for the `twitter_queries` cache.

use sqlx::types::Json;
use sqlx::PgPool;
use vlab_core::scrape::Tweet;

use crate::models::twitter_query::TwitterQuery;

const COLUMNS: &str = "id, query, tweets, created_at, updated_at";

pub struct TwitterQueryRepo;

impl TwitterQueryRepo {
    pub async fn find_by_query(
        pool: &PgPool,
        query_text: &str,
    ) -> Result<Option<TwitterQuery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM twitter_queries WHERE query = $1");
        sqlx::query_as::<_, TwitterQuery>(&query)
            .bind(query_text)
            .fetch_optional(pool)
            .await
    }

    /// Store tweets for a query unless a result is already cached.
    ///
    /// Returns the cached row in either case: when two requests race on
    /// the same query, the first insert wins and both see its tweets.
    pub async fn insert_if_absent(
        pool: &PgPool,
        query_text: &str,
        tweets: &[Tweet],
    ) -> Result<TwitterQuery, sqlx::Error> {
        let insert = format!(
            "INSERT INTO twitter_queries (query, tweets)
             VALUES ($1, $2)
             ON CONFLICT (query) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, TwitterQuery>(&insert)
            .bind(query_text)
            .bind(Json(tweets))
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(row) => Ok(row),
            None => {
                let select = format!("SELECT {COLUMNS} FROM twitter_queries WHERE query = $1");
                sqlx::query_as::<_, TwitterQuery>(&select)
                    .bind(query_text)
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// All cached queries, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TwitterQuery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM twitter_queries ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, TwitterQuery>(&query).fetch_all(pool).await
    }
}
