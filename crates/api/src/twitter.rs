//! Client for the Twitter v2 recent-search endpoint.

use std::time::Duration;

use serde::Deserialize;
use vlab_core::scrape::Tweet;
use vlab_core::types::Timestamp;

/// Per-request timeout for upstream calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fields requested for every tweet.
const TWEET_FIELDS: &str = "created_at,author_id";

#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// API origin (default: `https://api.twitter.com`). Overridable so tests
    /// can point at a local stub.
    pub api_base: String,
}

impl TwitterConfig {
    pub fn from_env() -> Self {
        let api_base = std::env::var("TWITTER_API_BASE")
            .unwrap_or_else(|_| "https://api.twitter.com".into())
            .trim_end_matches('/')
            .to_string();
        Self { api_base }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TwitterError {
    /// Upstream rejected the caller's bearer token.
    #[error("Invalid Bearer Token. Please enter a valid token.")]
    InvalidToken,

    #[error("Twitter API returned {status}")]
    Upstream { status: u16 },

    #[error("Twitter request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid Twitter API base URL: {0}")]
    BaseUrl(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Absent when the query matched nothing.
    #[serde(default)]
    data: Vec<ApiTweet>,
}

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: String,
    text: String,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    created_at: Option<Timestamp>,
}

impl From<ApiTweet> for Tweet {
    fn from(t: ApiTweet) -> Self {
        Tweet {
            id: t.id,
            text: t.text,
            username: t.author_id.unwrap_or_default(),
            created_at: t.created_at,
        }
    }
}

/// Thin wrapper over a shared [`reqwest::Client`].
pub struct TwitterClient {
    http: reqwest::Client,
    api_base: String,
}

impl TwitterClient {
    pub fn new(config: &TwitterConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_base: config.api_base.clone(),
        })
    }

    /// Fetch recent tweets matching `query`, authorising with the caller's
    /// own bearer token.
    pub async fn search_recent(
        &self,
        query: &str,
        bearer_token: &str,
    ) -> Result<Vec<Tweet>, TwitterError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/2/tweets/search/recent", self.api_base),
            &[("query", query), ("tweet.fields", TWEET_FIELDS)],
        )
        .map_err(|e| TwitterError::BaseUrl(e.to_string()))?;

        let response = self.http.get(url).bearer_auth(bearer_token).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TwitterError::InvalidToken);
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Twitter search failed");
            return Err(TwitterError::Upstream {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.data.into_iter().map(Tweet::from).collect())
    }
}
