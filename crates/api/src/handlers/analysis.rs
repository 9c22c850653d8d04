//! Handlers for the analysis endpoints under `/experiments`.
//!
//! Every handler validates its input completely before describing an
//! [`AnalysisJob`]; a rejected request never spawns a process. Job results
//! are returned as the runner's envelope through [`EnvelopeResponse`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vlab_core::datasets::{file_exists, is_csv, list_csv_files, resolve_in};
use vlab_core::error::CoreError;
use vlab_core::jobs::envelope::Envelope;
use vlab_core::{sentiment, topic, uploads};

use crate::analysis::runner::AnalysisJob;
use crate::error::{AppError, AppResult};
use crate::response::EnvelopeResponse;
use crate::state::AppState;

/// Success message for sentiment jobs.
const ANALYSIS_COMPLETE: &str = "Analysis complete";
/// Success message for topic modeling jobs.
const TOPIC_MODELING_COMPLETE: &str = "Topic modeling complete";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A file part received in a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-side file name; only its extension is ever used.
    pub file_name: String,
    pub bytes: Bytes,
}

/// Parsed multipart form: the optional `file` part plus all text parts.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.file = Some(UploadedFile { file_name, bytes });
            } else if !name.is_empty() {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    fn take_field(&mut self, name: &str) -> Option<String> {
        non_blank(self.fields.remove(name))
    }
}

/// Input for `POST /experiments/sentiment-analysis`.
///
/// Accepted as `multipart/form-data` (a `file` part, optionally with
/// `filename` / `datasetName` text parts) or as a JSON body naming an
/// existing file. Any other body yields an empty input.
#[derive(Debug, Default)]
pub struct CsvAnalysisInput {
    /// Name of a file already present in the upload area.
    pub filename: Option<String>,
    /// Name of a default dataset.
    pub dataset_name: Option<String>,
    pub upload: Option<UploadedFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvAnalysisJson {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    dataset_name: Option<String>,
}

impl FromRequest<AppState> for CsvAnalysisInput {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let mut form = UploadForm::read(multipart).await?;
            return Ok(Self {
                filename: form.take_field("filename"),
                dataset_name: form.take_field("datasetName"),
                upload: form.file,
            });
        }

        if content_type.starts_with("application/json") {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Self::default());
            }
            let json: CsvAnalysisJson = serde_json::from_slice(&body)
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
            return Ok(Self {
                filename: non_blank(json.filename),
                dataset_name: non_blank(json.dataset_name),
                upload: None,
            });
        }

        Ok(Self::default())
    }
}

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultTopicRequest {
    #[serde(default)]
    pub dataset_name: Option<String>,
    /// Number or numeric string; see [`topic::parse_num_topics`].
    #[serde(default)]
    pub num_topics: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn io_error(context: &str, err: std::io::Error) -> AppError {
    AppError::InternalError(format!("{context}: {err}"))
}

/// Write an uploaded CSV into the upload area, rejecting other file types
/// before anything touches the disk.
async fn store_csv_upload(state: &AppState, upload: &UploadedFile) -> AppResult<PathBuf> {
    if !is_csv(Path::new(&upload.file_name)) {
        return Err(AppError::BadRequest("Only CSV files are supported.".into()));
    }

    let path = uploads::save_upload(
        &state.config.analysis.uploads_dir,
        &upload.file_name,
        &upload.bytes,
    )
    .await
    .map_err(|e| io_error("Failed to store upload", e))?;

    tracing::debug!(path = %path.display(), size = upload.bytes.len(), "Stored upload");
    Ok(path)
}

/// Resolve the CSV for a sentiment run. Priority: an existing upload named
/// by `filename`, then a default dataset, then the uploaded file.
async fn resolve_csv_input(state: &AppState, input: CsvAnalysisInput) -> AppResult<PathBuf> {
    let analysis = &state.config.analysis;

    let existing = match (&input.filename, &input.dataset_name) {
        (Some(name), _) => Some(resolve_in(&analysis.uploads_dir, name)?),
        (None, Some(name)) => Some(resolve_in(&analysis.datasets_dir, name)?),
        (None, None) => None,
    };

    match (existing, input.upload) {
        (Some(path), _) => {
            if !file_exists(&path).await {
                return Err(AppError::NotFound("File not found.".into()));
            }
            if !is_csv(&path) {
                return Err(AppError::BadRequest("Only CSV files are supported.".into()));
            }
            Ok(path)
        }
        (None, Some(upload)) => store_csv_upload(state, &upload).await,
        (None, None) => Err(AppError::BadRequest("No input file provided.".into())),
    }
}

// ---------------------------------------------------------------------------
// Sentiment analysis
// ---------------------------------------------------------------------------

/// POST /api/v1/experiments/sentiment-analysis
///
/// Runs `sentiment_analysis.py <csv_path>`.
pub async fn sentiment_csv(
    State(state): State<AppState>,
    input: CsvAnalysisInput,
) -> AppResult<EnvelopeResponse> {
    let path = resolve_csv_input(&state, input).await?;

    let job = AnalysisJob::new(sentiment::SCRIPT_CSV, ANALYSIS_COMPLETE)
        .arg(path.to_string_lossy().into_owned());
    Ok(EnvelopeResponse(state.analysis.run(job).await))
}

/// POST /api/v1/experiments/sentiment-analysis/text
///
/// Runs `sentiment_analysis_text.py <text>`.
pub async fn sentiment_text(
    State(state): State<AppState>,
    Json(input): Json<TextAnalysisRequest>,
) -> AppResult<EnvelopeResponse> {
    let text = sentiment::validate_text(input.text.as_deref())?;

    let job = AnalysisJob::new(sentiment::SCRIPT_TEXT, ANALYSIS_COMPLETE).arg(text);
    Ok(EnvelopeResponse(state.analysis.run(job).await))
}

/// POST /api/v1/experiments/sentiment-analysis/text-multi
///
/// Validates every entry, then runs `sentiment_analysis_multi.py` with the
/// entries as a JSON array on stdin.
pub async fn sentiment_multi(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<EnvelopeResponse> {
    let entries = sentiment::validate_entries(body.get("data"))?;
    let payload = serde_json::to_string(&entries)
        .map_err(|e| AppError::InternalError(format!("Failed to encode entries: {e}")))?;

    tracing::debug!(entries = entries.len(), "Running multi-entry sentiment analysis");

    let job = AnalysisJob::new(sentiment::SCRIPT_MULTI, ANALYSIS_COMPLETE).stdin(payload);
    Ok(EnvelopeResponse(state.analysis.run(job).await))
}

/// GET /api/v1/experiments/default-datasets
///
/// 400 when the dataset directory is missing, 404 when it holds no CSVs.
pub async fn default_datasets(State(state): State<AppState>) -> AppResult<Json<DatasetsResponse>> {
    let dir = &state.config.analysis.datasets_dir;
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(AppError::BadRequest("Dataset folder not found.".into()));
    }

    let datasets = list_csv_files(dir)
        .await
        .map_err(|e| io_error("Failed to read datasets", e))?;
    if datasets.is_empty() {
        return Err(AppError::NotFound("No CSV datasets found.".into()));
    }

    Ok(Json(DatasetsResponse { datasets }))
}

// ---------------------------------------------------------------------------
// Topic modeling
// ---------------------------------------------------------------------------

/// POST /api/v1/experiments/run-topic-modeling
///
/// Multipart form with a `file` part and optional `numTopics`. Runs
/// `topic_modeling.py <csv_path> <num_topics>` with lenient extraction.
pub async fn run_topic_modeling(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<EnvelopeResponse> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form
        .file
        .take()
        .ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;

    let num_topics = topic::parse_num_topics(
        form.take_field("numTopics").map(Value::String).as_ref(),
    )?;
    let path = store_csv_upload(&state, &upload).await?;

    Ok(EnvelopeResponse(
        run_topic_job(&state, &path, num_topics).await,
    ))
}

/// POST /api/v1/experiments/topic-modeling-default
///
/// Topic modeling over a named default dataset.
pub async fn topic_modeling_default(
    State(state): State<AppState>,
    Json(input): Json<DefaultTopicRequest>,
) -> AppResult<EnvelopeResponse> {
    let name = non_blank(input.dataset_name)
        .ok_or_else(|| CoreError::Validation("Dataset name is required".into()))?;
    let num_topics = topic::parse_num_topics(input.num_topics.as_ref())?;

    let path = resolve_in(&state.config.analysis.datasets_dir, &name)?;
    if !file_exists(&path).await {
        return Err(AppError::NotFound("Dataset not found".into()));
    }

    Ok(EnvelopeResponse(
        run_topic_job(&state, &path, num_topics).await,
    ))
}

/// GET /api/v1/experiments/default-datasets-topic
///
/// Lists default datasets for topic modeling; an empty list is not an error.
pub async fn default_datasets_topic(
    State(state): State<AppState>,
) -> AppResult<Json<DatasetsResponse>> {
    let datasets = list_csv_files(&state.config.analysis.datasets_dir)
        .await
        .map_err(|e| io_error("Failed to read datasets", e))?;
    Ok(Json(DatasetsResponse { datasets }))
}

async fn run_topic_job(
    state: &AppState,
    path: &Path,
    num_topics: u32,
) -> Envelope {
    let job = AnalysisJob::new(topic::SCRIPT, TOPIC_MODELING_COMPLETE)
        .arg(path.to_string_lossy().into_owned())
        .arg(num_topics.to_string())
        .lenient();
    state.analysis.run(job).await
}
