//! Axum route handlers for the resume processing API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};

use crate::errors::AppError;
use crate::extraction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessQuery {
    pub directory: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub message: String,
}

/// POST /api/v1/resumes/process?directory=...
///
/// Kicks off a background scan of the directory (defaults to the configured
/// resumes dir). Extraction makes one LLM call per new resume, so the request
/// only confirms the kickoff; progress lands in the logs.
pub async fn handle_process(
    State(state): State<AppState>,
    Query(params): Query<ProcessQuery>,
) -> Result<(StatusCode, Json<ProcessResponse>), AppError> {
    let directory = params
        .directory
        .unwrap_or_else(|| state.config.resumes_dir.clone());
    let dir = PathBuf::from(&directory);
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Directory '{directory}' not found"
        )));
    }

    tokio::spawn(async move {
        match extraction::process_resumes(&state.db, state.extractor.as_ref(), &dir).await {
            Ok(report) => info!(
                "Resume processing finished: {} processed, {} skipped, {} failed",
                report.processed, report.skipped, report.failed
            ),
            Err(e) => error!("Resume processing aborted: {e}"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ProcessResponse {
            message: format!("Processing started for directory '{directory}'"),
        }),
    ))
}
