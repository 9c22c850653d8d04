//! Web scraping and Twitter search request types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Longest URL handed to a scraper script.
pub const MAX_URL_LEN: usize = 2048;

/// Longest Twitter search query (the recent-search API limit).
pub const MAX_QUERY_LEN: usize = 512;

/// Scraper backend selected by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMethod {
    BeautifulSoup,
    Requests,
}

impl ScrapeMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeMethod::BeautifulSoup => "BeautifulSoup",
            ScrapeMethod::Requests => "Requests",
        }
    }

    /// Script invoked as `<script> <url>`.
    pub fn script(self) -> &'static str {
        match self {
            ScrapeMethod::BeautifulSoup => "scrape_bs4.py",
            ScrapeMethod::Requests => "scrape_requests.py",
        }
    }
}

impl FromStr for ScrapeMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BeautifulSoup" => Ok(ScrapeMethod::BeautifulSoup),
            "Requests" => Ok(ScrapeMethod::Requests),
            _ => Err(CoreError::Validation("Invalid method selected".into())),
        }
    }
}

/// Check that `url` is an absolute http(s) URL with a host.
///
/// The URL is passed to the script as a single argument, so this only
/// guards against obviously wrong input (and leading `-` option injection).
pub fn validate_url(url: Option<&str>) -> Result<&str, CoreError> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| CoreError::Validation("URL is required".into()))?;

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| CoreError::Validation("URL must start with http:// or https://".into()))?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(CoreError::Validation("URL must include a host".into()));
    }
    if url.len() > MAX_URL_LEN || url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CoreError::Validation("Invalid URL".into()));
    }
    Ok(url)
}

/// Validate a Twitter search request, returning `(query, bearer_token)`.
pub fn validate_twitter_request<'a>(
    query: Option<&'a str>,
    bearer_token: Option<&'a str>,
) -> Result<(&'a str, &'a str), CoreError> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());
    let token = bearer_token.map(str::trim).filter(|t| !t.is_empty());
    match (query, token) {
        (Some(q), Some(_)) if q.len() > MAX_QUERY_LEN => Err(CoreError::Validation(format!(
            "Query exceeds the maximum of {MAX_QUERY_LEN} characters"
        ))),
        (Some(q), Some(t)) => Ok((q, t)),
        _ => Err(CoreError::Validation(
            "Bearer token and query are required.".into(),
        )),
    }
}

/// A tweet as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    /// Author id; the recent-search API does not expand usernames.
    pub username: String,
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
