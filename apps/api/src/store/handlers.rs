//! Axum route handlers for candidate listing and lookup.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// GET /api/v1/candidates
///
/// Returns every stored candidate with work experience populated.
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let candidates = store::get_all_candidates(&state.db).await?;
    Ok(Json(candidates))
}

/// POST /api/v1/candidates/lookup
///
/// Returns the candidates matching the given id set (detail view after a
/// screening pass). An empty id list yields an empty result.
pub async fn handle_lookup_candidates(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let candidates = store::get_candidates_by_ids(&state.db, &request.ids).await?;
    Ok(Json(candidates))
}

/// GET /api/v1/candidates/search?name=...
///
/// Case-insensitive substring search on candidate names.
pub async fn handle_search_candidates(
    State(state): State<AppState>,
    Query(params): Query<NameQuery>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let candidates = store::search_candidates_by_name(&state.db, &params.name).await?;
    Ok(Json(candidates))
}
