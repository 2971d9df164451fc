use crate::error::{AppError, Result};
use crate::models::analysis::{AnalysisReport, FullDataset};
use crate::services::analysis::{ConvertedFile, OutputFormat, UploadedFile};
use crate::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
        Multipart, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

const FILE_FIELD: &str = "file";

#[derive(Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    full_data: bool,
}

#[derive(Deserialize)]
pub struct ConvertQuery {
    #[serde(default = "default_output_format")]
    output_format: String,
}

fn default_output_format() -> String {
    "csv".to_string()
}

pub async fn data_root_handler() -> Json<Value> {
    Json(json!({ "message": "Data Analysis API is running" }))
}

pub async fn upload_file_handler(
    State(app_state): State<AppState>,
    query: std::result::Result<Query<UploadQuery>, QueryRejection>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>> {
    let Query(query) = query?;
    let file = read_upload(multipart?).await?;
    file.kind()?;

    let service = app_state.analysis_service.clone();
    let full_data = query.full_data;
    let report = run_blocking(move || service.analyze(&file, full_data)).await?;

    Ok(Json(report))
}

pub async fn full_dataset_handler(
    State(app_state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<FullDataset>> {
    let file = read_upload(multipart?).await?;
    file.kind()?;

    let service = app_state.analysis_service.clone();
    let dataset = run_blocking(move || service.full_dataset(&file)).await?;

    Ok(Json(dataset))
}

pub async fn convert_file_handler(
    State(app_state): State<AppState>,
    query: std::result::Result<Query<ConvertQuery>, QueryRejection>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let Query(query) = query?;
    let file = read_upload(multipart?).await?;
    file.kind()?;
    let format: OutputFormat = query.output_format.parse()?;

    let service = app_state.analysis_service.clone();
    let converted = run_blocking(move || service.convert(&file, format)).await?;

    attachment(converted)
}

/// Pulls the `file` field out of a multipart body, ignoring other fields.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;

        tracing::info!(filename = %filename, size = bytes.len(), "Received upload");
        return Ok(UploadedFile::new(filename, bytes.to_vec()));
    }

    Err(AppError::MissingFile)
}

fn upload_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        tracing::debug!(detail = %err.body_text(), "Rejected multipart body");
        AppError::Validation("Invalid multipart body".to_string())
    }
}

/// Parsing and profiling are CPU-bound; keep them off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, crate::services::analysis::AnalysisError>
        + Send
        + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("analysis task failed: {e}")))?
        .map_err(AppError::from)
}

fn attachment(file: ConvertedFile) -> Result<Response> {
    let disposition = format!(
        "attachment; filename={}",
        sanitize_filename(&file.filename)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| AppError::Internal(format!("invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.media_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// Header-safe filename: printable ASCII without quoting or parameter
/// delimiters.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | ';' | '\\' | ',' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}
