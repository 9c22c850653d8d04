//! Handlers for web scraping and the Twitter search cache.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vlab_core::error::CoreError;
use vlab_core::scrape::{validate_twitter_request, validate_url, ScrapeMethod, Tweet};
use vlab_db::models::twitter_query::TwitterQuery;
use vlab_db::repositories::TwitterQueryRepo;

use crate::analysis::runner::AnalysisJob;
use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, EnvelopeResponse, MessageResponse};
use crate::state::AppState;
use crate::twitter::TwitterError;

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterSearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// POST /api/v1/scrape
///
/// Runs the scraper script for the selected method with the URL as its
/// only argument. The scrapers log progress to stderr, so only their exit
/// status decides failure.
pub async fn scrape(
    State(state): State<AppState>,
    Json(input): Json<ScrapeRequest>,
) -> AppResult<EnvelopeResponse> {
    let method: ScrapeMethod = input.method.as_deref().unwrap_or_default().parse()?;
    let url = validate_url(input.url.as_deref())?;

    tracing::debug!(method = method.as_str(), url, "Scraping");

    let job = AnalysisJob::new(method.script(), "Scraping successful")
        .arg(url)
        .tolerate_stderr();
    Ok(EnvelopeResponse(state.analysis.run(job).await))
}

/// POST /api/v1/scrape/twitter
///
/// A cached query is answered from the database without calling upstream.
/// Otherwise recent tweets are fetched with the caller's bearer token,
/// stored, and returned.
pub async fn twitter_search(
    State(state): State<AppState>,
    Json(input): Json<TwitterSearchRequest>,
) -> AppResult<Json<MessageResponse<Vec<Tweet>>>> {
    let (query, token) =
        validate_twitter_request(input.query.as_deref(), input.bearer_token.as_deref())?;

    if let Some(cached) = TwitterQueryRepo::find_by_query(&state.pool, query).await? {
        tracing::debug!(query, "Twitter cache hit");
        return Ok(Json(MessageResponse {
            message: format!("Data for \"{query}\" already exists."),
            data: cached.tweets.0,
        }));
    }

    let tweets = state
        .twitter
        .search_recent(query, token)
        .await
        .map_err(|e| match e {
            err @ TwitterError::InvalidToken => {
                AppError::Core(CoreError::Unauthorized(err.to_string()))
            }
            other => AppError::InternalError(format!("Error fetching tweets: {other}")),
        })?;

    let stored = TwitterQueryRepo::insert_if_absent(&state.pool, query, &tweets).await?;
    tracing::info!(query, count = stored.tweets.len(), "Twitter results cached");

    Ok(Json(MessageResponse {
        message: "Data saved successfully!".into(),
        data: stored.tweets.0,
    }))
}

/// GET /api/v1/scrape/twitter-stored
pub async fn twitter_stored(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TwitterQuery>>>> {
    let stored = TwitterQueryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: stored }))
}
