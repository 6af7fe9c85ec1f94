//! Axum route handlers for the Screening API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::screening::engine::{score_and_rank, ScreeningCriteria, ScreeningOutcome};
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct ScreenRequest {
    #[serde(flatten)]
    pub criteria: ScreeningCriteria,
    /// Criteria remembered by the caller's session, merged into any blank
    /// field. Session memory lives with the caller, never in the engine.
    #[serde(default)]
    pub remembered: Option<ScreeningCriteria>,
}

/// POST /api/v1/screen
///
/// Scores every stored candidate against the request and returns the ranked
/// shortlist (top 5) and longlist (top 20).
pub async fn handle_screen(
    State(state): State<AppState>,
    Json(request): Json<ScreenRequest>,
) -> Result<Json<ScreeningOutcome>, AppError> {
    let ScreenRequest {
        criteria,
        remembered,
    } = request;

    let criteria = match remembered {
        Some(fallback) => criteria.or(&fallback),
        None => criteria,
    };
    if criteria.is_empty() {
        return Err(AppError::MissingCriteria);
    }

    let candidates = store::get_all_candidates(&state.db).await?;
    Ok(Json(score_and_rank(candidates, &criteria)))
}
