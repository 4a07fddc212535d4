pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Store-backed matching
        .route(
            "/api/v1/candidates/:id/recommendations",
            get(handlers::handle_recommendations),
        )
        .route(
            "/api/v1/candidates/:id/opportunities",
            get(handlers::handle_opportunities),
        )
        .route(
            "/api/v1/candidates/:id/postings/:posting_id/fit",
            get(handlers::handle_candidate_fit),
        )
        .route(
            "/api/v1/postings/:id/applicants",
            get(handlers::handle_applicants),
        )
        // Snapshot matching: the host posts the records
        .route(
            "/api/v1/match/recommend",
            post(handlers::handle_match_recommend),
        )
        .route("/api/v1/match/fit", post(handlers::handle_match_fit))
        .with_state(state)
}
