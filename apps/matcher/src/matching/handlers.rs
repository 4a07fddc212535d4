//! Axum route handlers for the Matching API.
//!
//! Store-backed handlers fetch records first and then run the engine on the
//! blocking pool; snapshot handlers take the records straight from the body.

use std::collections::{BTreeSet, HashSet};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::ranking::{
    browse_by_location, fit_score, rank_applicants, recommend, Recommendation, ScoredApplicant,
};
use crate::matching::scoring::FitBreakdown;
use crate::matching::skill_gap::{skill_gap, RoadmapItem, SkillGap};
use crate::models::{Candidate, CandidateId, Posting, PostingId};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub candidate_id: CandidateId,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct OpportunitiesQuery {
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Opportunity {
    pub posting: Posting,
    pub score: f64,
    pub roadmap: Vec<RoadmapItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpportunitiesResponse {
    pub title: String,
    pub location: Option<String>,
    pub applied_posting_ids: BTreeSet<PostingId>,
    pub opportunities: Vec<Opportunity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FitResponse {
    pub candidate_id: CandidateId,
    pub posting_id: PostingId,
    pub score: f64,
    pub breakdown: FitBreakdown,
    pub skill_gap: SkillGap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicantsResponse {
    pub posting_id: PostingId,
    pub applicants: Vec<ScoredApplicant>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub candidate: Candidate,
    #[serde(default)]
    pub catalog: Vec<Posting>,
}

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub candidate: Candidate,
    pub posting: Posting,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs CPU-bound scoring off the async executor.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("matching task failed")))
}

async fn require_candidate(state: &AppState, id: CandidateId) -> Result<Candidate, AppError> {
    state
        .store
        .candidate(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

async fn require_posting(state: &AppState, id: PostingId) -> Result<Posting, AppError> {
    state
        .store
        .posting(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Posting {id} not found")))
}

fn fit_response(candidate: &Candidate, posting: &Posting, state: &AppState) -> FitResponse {
    let breakdown = fit_score(candidate, posting);
    FitResponse {
        candidate_id: candidate.id,
        posting_id: posting.id,
        score: breakdown.rounded().total,
        breakdown: breakdown.rounded(),
        skill_gap: skill_gap(&candidate.skills, &posting.required_skills, &state.resources),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store-backed handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/candidates/:id/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(candidate_id): Path<CandidateId>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let candidate = require_candidate(&state, candidate_id).await?;
    let catalog = state.store.postings().await?;
    let resources = state.resources.clone();

    let recommendations = run_blocking(move || {
        recommend(&candidate, &catalog, &candidate.applied_posting_ids, &resources)
    })
    .await?;

    Ok(Json(RecommendationsResponse {
        candidate_id,
        recommendations,
    }))
}

/// GET /api/v1/candidates/:id/opportunities?location=X
///
/// With a location, every posting there ranked by pairwise fit. Without one,
/// the personalized top list.
pub async fn handle_opportunities(
    State(state): State<AppState>,
    Path(candidate_id): Path<CandidateId>,
    Query(params): Query<OpportunitiesQuery>,
) -> Result<Json<OpportunitiesResponse>, AppError> {
    let candidate = require_candidate(&state, candidate_id).await?;
    let catalog = state.store.postings().await?;
    let applied_posting_ids = candidate.applied_posting_ids.clone();
    let location = params
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    let (title, opportunities) = match location.clone() {
        Some(location) => {
            let title = format!("Jobs in {location}");
            let browsed = run_blocking(move || browse_by_location(&candidate, &catalog, &location)).await?;
            let opportunities = browsed
                .into_iter()
                .map(|s| Opportunity {
                    posting: s.posting,
                    score: s.score,
                    roadmap: Vec::new(),
                })
                .collect();
            (title, opportunities)
        }
        None => {
            let resources = state.resources.clone();
            let recommended = run_blocking(move || {
                recommend(&candidate, &catalog, &candidate.applied_posting_ids, &resources)
            })
            .await?;
            let opportunities = recommended
                .into_iter()
                .map(|r| Opportunity {
                    posting: r.posting,
                    score: r.score,
                    roadmap: r.roadmap,
                })
                .collect();
            ("Jobs Recommended For You".to_string(), opportunities)
        }
    };

    Ok(Json(OpportunitiesResponse {
        title,
        location,
        applied_posting_ids,
        opportunities,
    }))
}

/// GET /api/v1/candidates/:id/postings/:posting_id/fit
pub async fn handle_candidate_fit(
    State(state): State<AppState>,
    Path((candidate_id, posting_id)): Path<(CandidateId, PostingId)>,
) -> Result<Json<FitResponse>, AppError> {
    let candidate = require_candidate(&state, candidate_id).await?;
    let posting = require_posting(&state, posting_id).await?;

    let worker_state = state.clone();
    let response = run_blocking(move || fit_response(&candidate, &posting, &worker_state)).await?;
    Ok(Json(response))
}

/// GET /api/v1/postings/:id/applicants
pub async fn handle_applicants(
    State(state): State<AppState>,
    Path(posting_id): Path<PostingId>,
) -> Result<Json<ApplicantsResponse>, AppError> {
    let posting = require_posting(&state, posting_id).await?;
    let applicants = state.store.applicants(posting_id).await?;

    let applicants = run_blocking(move || rank_applicants(&posting, &applicants)).await?;
    Ok(Json(ApplicantsResponse {
        posting_id,
        applicants,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshot handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/recommend
///
/// The catalog must not repeat a posting id; applied-posting exclusion works by id.
pub async fn handle_match_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let mut seen = HashSet::new();
    if let Some(dup) = request.catalog.iter().find(|p| !seen.insert(p.id)) {
        return Err(AppError::Validation(format!(
            "catalog contains posting {} more than once",
            dup.id
        )));
    }

    let RecommendRequest { candidate, catalog } = request;
    let candidate_id = candidate.id;
    let resources = state.resources.clone();
    let recommendations = run_blocking(move || {
        recommend(&candidate, &catalog, &candidate.applied_posting_ids, &resources)
    })
    .await?;

    Ok(Json(RecommendationsResponse {
        candidate_id,
        recommendations,
    }))
}

/// POST /api/v1/match/fit
pub async fn handle_match_fit(
    State(state): State<AppState>,
    Json(request): Json<FitRequest>,
) -> Result<Json<FitResponse>, AppError> {
    let FitRequest { candidate, posting } = request;
    let response = run_blocking(move || fit_response(&candidate, &posting, &state)).await?;
    Ok(Json(response))
}
