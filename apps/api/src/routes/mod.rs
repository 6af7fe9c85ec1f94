pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction_handlers;
use crate::screening::handlers as screening_handlers;
use crate::state::AppState;
use crate::store::handlers as store_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screen", post(screening_handlers::handle_screen))
        // Resume processing API
        .route(
            "/api/v1/resumes/process",
            post(extraction_handlers::handle_process),
        )
        // Candidate API
        .route(
            "/api/v1/candidates",
            get(store_handlers::handle_list_candidates),
        )
        .route(
            "/api/v1/candidates/lookup",
            post(store_handlers::handle_lookup_candidates),
        )
        .route(
            "/api/v1/candidates/search",
            get(store_handlers::handle_search_candidates),
        )
        .with_state(state)
}
