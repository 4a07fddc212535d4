//! Ranking/Filtering Policy — the engine's entry points.
//!
//! Every function here is a pure computation over the records it is handed.
//! No vocabulary, weight or result survives the call.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::document::{candidate_document, posting_document};
use crate::matching::scoring::{round2, CatalogFitPolicy, FitBreakdown, FitPolicy, PairwiseFitPolicy};
use crate::matching::skill_gap::{skill_gap, ResourceCatalog, RoadmapItem};
use crate::matching::vector_space::similarity;
use crate::models::{Candidate, CandidateId, Posting, PostingId};

/// Recommendations must score strictly above this.
pub const SCORE_FLOOR: f64 = 25.0;
pub const MAX_RECOMMENDATIONS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub posting: Posting,
    /// Total rounded to two decimals.
    pub score: f64,
    pub breakdown: FitBreakdown,
    pub roadmap: Vec<RoadmapItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPosting {
    pub posting: Posting,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredApplicant {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub score: f64,
}

fn by_total_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Pairwise-mode score of one candidate against one posting.
pub fn fit_score(candidate: &Candidate, posting: &Posting) -> FitBreakdown {
    let scores = similarity(&candidate_document(candidate), &[posting_document(posting)]);
    let sim = scores.first().copied().unwrap_or(0.0);
    PairwiseFitPolicy.score(sim, candidate, posting)
}

/// Personalized top list: the candidate against the whole catalog in one corpus.
///
/// Applied postings stay in the corpus (they shape IDF) but never appear in
/// the output. Survivors score above [`SCORE_FLOOR`], sorted descending at
/// full precision, stable on catalog order, at most [`MAX_RECOMMENDATIONS`].
pub fn recommend(
    candidate: &Candidate,
    catalog: &[Posting],
    applied: &BTreeSet<PostingId>,
    resources: &ResourceCatalog,
) -> Vec<Recommendation> {
    if catalog.is_empty() {
        return Vec::new();
    }

    let documents: Vec<String> = catalog.iter().map(posting_document).collect();
    let similarities = similarity(&candidate_document(candidate), &documents);

    let mut scored: Vec<(FitBreakdown, &Posting)> = catalog
        .iter()
        .zip(similarities)
        .filter(|(posting, _)| !applied.contains(&posting.id))
        .map(|(posting, sim)| (CatalogFitPolicy.score(sim, candidate, posting), posting))
        .filter(|(fit, _)| fit.total > SCORE_FLOOR)
        .collect();

    scored.sort_by(|(a, _), (b, _)| by_total_desc(a.total, b.total));
    scored.truncate(MAX_RECOMMENDATIONS);

    debug!(
        candidate_id = candidate.id,
        policy = CatalogFitPolicy.name(),
        catalog = catalog.len(),
        applied = applied.len(),
        recommended = scored.len(),
        "computed recommendations"
    );

    scored
        .into_iter()
        .map(|(fit, posting)| Recommendation {
            posting: posting.clone(),
            score: round2(fit.total),
            breakdown: fit.rounded(),
            roadmap: skill_gap(&candidate.skills, &posting.required_skills, resources).roadmap,
        })
        .collect()
}

/// Every posting in `location`, each scored in pairwise mode.
///
/// Postings are taken newest first (undated last) and then stably sorted by
/// score, so equal scores keep the newest-first order. No floor, no cap.
pub fn browse_by_location(candidate: &Candidate, catalog: &[Posting], location: &str) -> Vec<ScoredPosting> {
    let mut in_location: Vec<&Posting> = catalog.iter().filter(|p| p.in_location(location)).collect();
    in_location.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut scored: Vec<(f64, &Posting)> = in_location
        .into_iter()
        .map(|posting| (fit_score(candidate, posting).total, posting))
        .collect();
    scored.sort_by(|(a, _), (b, _)| by_total_desc(*a, *b));

    debug!(
        candidate_id = candidate.id,
        location,
        matched = scored.len(),
        "browsed postings by location"
    );

    scored
        .into_iter()
        .map(|(total, posting)| ScoredPosting {
            posting: posting.clone(),
            score: round2(total),
        })
        .collect()
}

/// Applicants of one posting ranked by pairwise fit; ties keep application order.
pub fn rank_applicants(posting: &Posting, applicants: &[Candidate]) -> Vec<ScoredApplicant> {
    let mut scored: Vec<(f64, &Candidate)> = applicants
        .iter()
        .map(|candidate| (fit_score(candidate, posting).total, candidate))
        .collect();
    scored.sort_by(|(a, _), (b, _)| by_total_desc(*a, *b));

    debug!(
        posting_id = posting.id,
        policy = PairwiseFitPolicy.name(),
        applicants = scored.len(),
        "ranked applicants"
    );

    scored
        .into_iter()
        .map(|(total, candidate)| ScoredApplicant {
            candidate_id: candidate.id,
            full_name: candidate.full_name.clone(),
            score: round2(total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, SkillList};
    use chrono::{TimeZone, Utc};

    fn project(description: &str) -> Project {
        Project {
            title: "project".to_string(),
            description: Some(description.to_string()),
        }
    }

    fn posting(id: PostingId, role: &str, description: &str, skills: Vec<&str>) -> Posting {
        Posting {
            id,
            role: role.to_string(),
            description: Some(description.to_string()),
            required_skills: SkillList::from(skills),
            min_aptitude: 7.0,
            location: "Pune".to_string(),
            ..Default::default()
        }
    }

    fn backend_candidate() -> Candidate {
        Candidate {
            id: 1,
            full_name: "Asha".to_string(),
            skills: SkillList::from(vec!["Rust", "Tokio", "Postgres"]),
            projects: vec![
                project("backend engineer building async services"),
                project("postgres replication tooling"),
            ],
            aptitude: Some(8.2),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<Posting> {
        vec![
            posting(10, "Backend Engineer", "async services in rust", vec!["Rust", "Tokio"]),
            posting(11, "Data Analyst", "dashboards and reporting", vec!["Python", "Pandas"]),
            posting(12, "Database Intern", "postgres replication tooling", vec!["Postgres", "SQL"]),
            posting(13, "Frontend Developer", "landing pages", vec!["React", "CSS"]),
            posting(14, "Platform Engineer", "rust services tokio", vec!["Rust", "Kubernetes"]),
            posting(15, "Rust Intern", "backend async rust", vec!["Rust"]),
            posting(16, "Systems Engineer", "services postgres rust", vec!["Rust", "Postgres"]),
        ]
    }

    #[test]
    fn test_recommend_respects_floor_order_and_limit() {
        let recs = recommend(&backend_candidate(), &catalog(), &BTreeSet::new(), &ResourceCatalog::builtin());
        assert!(!recs.is_empty());
        assert!(recs.len() <= MAX_RECOMMENDATIONS);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for rec in &recs {
            assert!(rec.score > SCORE_FLOOR);
            assert!(rec.score <= 100.0);
            assert!(rec.score.is_finite());
        }
    }

    #[test]
    fn test_recommend_excludes_applied_postings() {
        let applied: BTreeSet<PostingId> = [10, 15].into_iter().collect();
        let recs = recommend(&backend_candidate(), &catalog(), &applied, &ResourceCatalog::builtin());
        assert!(recs.iter().all(|r| !applied.contains(&r.posting.id)));
    }

    #[test]
    fn test_recommend_attaches_roadmap() {
        let candidate = Candidate {
            skills: SkillList::from(vec!["Python"]),
            projects: vec![project("python dashboards"), project("reporting scripts")],
            aptitude: Some(9.0),
            ..Default::default()
        };
        let catalog = vec![posting(1, "Data Analyst", "python dashboards reporting", vec!["Python", "Pandas", "Tableau"])];
        let recs = recommend(&candidate, &catalog, &BTreeSet::new(), &ResourceCatalog::builtin());

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].roadmap.len(), 1);
        assert_eq!(recs[0].roadmap[0].skill, "Pandas");
    }

    #[test]
    fn test_recommend_empty_catalog() {
        let recs = recommend(&backend_candidate(), &[], &BTreeSet::new(), &ResourceCatalog::builtin());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_blank_candidate_gets_no_experience_bonus() {
        let blank = Candidate {
            aptitude: Some(9.0),
            ..Default::default()
        };
        let catalog = vec![
            posting(1, "Backend Engineer", "rust", vec!["Rust"]),
            posting(2, "Data Analyst", "python", vec!["Python"]),
            posting(3, "Designer", "figma", vec!["Figma"]),
        ];
        let recs = recommend(&blank, &catalog, &BTreeSet::new(), &ResourceCatalog::builtin());
        // Eligibility alone is 10, below the floor, and nothing overlaps.
        assert!(recs.is_empty());
        for p in &catalog {
            let fit = fit_score(&blank, p);
            assert_eq!(fit.experience_bonus, 0.0);
            assert_eq!(fit.similarity, 0.0);
        }
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let resources = ResourceCatalog::builtin();
        let first = recommend(&backend_candidate(), &catalog(), &BTreeSet::new(), &resources);
        let second = recommend(&backend_candidate(), &catalog(), &BTreeSet::new(), &resources);
        let ids = |recs: &[Recommendation]| recs.iter().map(|r| (r.posting.id, r.score)).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_identical_text_scores_near_full_pairwise() {
        let candidate = Candidate {
            skills: SkillList::from(vec!["Rust", "Tokio"]),
            projects: vec![project("backend engineer"), project("async services")],
            aptitude: Some(8.0),
            ..Default::default()
        };
        let target = posting(1, "backend engineer", "async services", vec!["Rust", "Tokio"]);
        let fit = fit_score(&candidate, &target);

        assert!((fit.similarity - 1.0).abs() < 1e-9);
        assert!((fit.total - 130.0).abs() < 1e-6);
    }

    #[test]
    fn test_catalog_and_pairwise_scores_may_differ() {
        let candidate = backend_candidate();
        let catalog = catalog();
        let target = &catalog[0];

        let pairwise = fit_score(&candidate, target).total;
        let in_catalog = recommend(&candidate, &catalog, &BTreeSet::new(), &ResourceCatalog::builtin())
            .into_iter()
            .find(|r| r.posting.id == target.id)
            .map(|r| r.score);

        // Both are valid; the two modes are not required to agree.
        assert!(pairwise.is_finite() && pairwise <= 130.0);
        if let Some(score) = in_catalog {
            assert!(score <= 100.0);
        }
    }

    #[test]
    fn test_browse_filters_location_without_floor_or_cap() {
        let mut catalog = catalog();
        catalog[1].location = " pune ".to_string();
        catalog[1].min_aptitude = 9.0;
        catalog[3].location = "Chennai".to_string();
        let browsed = browse_by_location(&backend_candidate(), &catalog, "Pune");

        assert_eq!(browsed.len(), catalog.len() - 1);
        assert!(browsed.iter().all(|s| s.posting.id != 13));
        assert!(browsed.iter().any(|s| s.score <= SCORE_FLOOR));
        for pair in browsed.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_browse_ties_keep_newest_first() {
        let blank = Candidate::default();
        let mut older = posting(1, "Welder", "", vec![]);
        older.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut newer = posting(2, "Carpenter", "", vec![]);
        newer.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let undated = posting(3, "Painter", "", vec![]);

        let browsed = browse_by_location(&blank, &[undated, older, newer], "pune");
        let ids: Vec<PostingId> = browsed.iter().map(|s| s.posting.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_rank_applicants_orders_by_fit() {
        let target = posting(1, "Backend Engineer", "async services in rust", vec!["Rust", "Tokio"]);
        let weak = Candidate {
            id: 7,
            full_name: "Ravi".to_string(),
            skills: SkillList::from(vec!["Figma"]),
            ..Default::default()
        };
        let ranked = rank_applicants(&target, &[weak, backend_candidate()]);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate_id, 1);
        assert_eq!(ranked[1].candidate_id, 7);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_rank_applicants_ties_keep_application_order() {
        let target = posting(1, "Welder", "", vec![]);
        let a = Candidate { id: 3, ..Default::default() };
        let b = Candidate { id: 4, ..Default::default() };
        let ranked = rank_applicants(&target, &[a, b]);
        assert_eq!(ranked.iter().map(|r| r.candidate_id).collect::<Vec<_>>(), vec![3, 4]);
    }
}
