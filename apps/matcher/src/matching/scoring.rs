//! Composite Scorer — blends similarity with eligibility and experience bonuses.
//!
//! Two policies share one shape and differ only in how much the content term
//! weighs. Catalog mode (one candidate against the whole catalog) uses 70,
//! pairwise mode (one candidate against one posting) uses 100. Both are kept
//! as they are; they are not meant to agree.

use serde::{Deserialize, Serialize};

use crate::models::{Candidate, Posting};

pub const ELIGIBILITY_BONUS: f64 = 10.0;
pub const POINTS_PER_PROJECT: f64 = 10.0;
pub const MAX_EXPERIENCE_BONUS: f64 = 20.0;

/// Every part of a composite score, at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitBreakdown {
    pub similarity: f64,
    pub content_score: f64,
    pub eligibility_bonus: f64,
    pub experience_bonus: f64,
    pub total: f64,
}

impl FitBreakdown {
    /// Copy with every component rounded to two decimals, for responses.
    pub fn rounded(&self) -> Self {
        Self {
            similarity: round2(self.similarity),
            content_score: round2(self.content_score),
            eligibility_bonus: round2(self.eligibility_bonus),
            experience_bonus: round2(self.experience_bonus),
            total: round2(self.total),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A scoring policy. Implementations only choose the content weight; the
/// bonuses are shared.
pub trait FitPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn content_weight(&self) -> f64;

    fn score(&self, similarity: f64, candidate: &Candidate, posting: &Posting) -> FitBreakdown {
        let similarity = if similarity.is_finite() {
            similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let content_score = similarity * self.content_weight();
        let eligibility_bonus = eligibility_bonus(candidate, posting);
        let experience_bonus = experience_bonus(candidate);

        FitBreakdown {
            similarity,
            content_score,
            eligibility_bonus,
            experience_bonus,
            total: content_score + eligibility_bonus + experience_bonus,
        }
    }
}

/// One candidate scored against a whole catalog in a single corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFitPolicy;

impl FitPolicy for CatalogFitPolicy {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn content_weight(&self) -> f64 {
        70.0
    }
}

/// One candidate scored against one posting in a two-document corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseFitPolicy;

impl FitPolicy for PairwiseFitPolicy {
    fn name(&self) -> &'static str {
        "pairwise"
    }

    fn content_weight(&self) -> f64 {
        100.0
    }
}

/// An aptitude that is missing, zero or NaN never qualifies.
pub fn is_eligible(candidate: &Candidate, posting: &Posting) -> bool {
    match candidate.aptitude {
        Some(aptitude) if aptitude != 0.0 && !aptitude.is_nan() => aptitude >= posting.min_aptitude,
        _ => false,
    }
}

fn eligibility_bonus(candidate: &Candidate, posting: &Posting) -> f64 {
    if is_eligible(candidate, posting) {
        ELIGIBILITY_BONUS
    } else {
        0.0
    }
}

fn experience_bonus(candidate: &Candidate) -> f64 {
    (candidate.project_count() as f64 * POINTS_PER_PROJECT).min(MAX_EXPERIENCE_BONUS)
}
