//! Document Builder — flattens candidates and postings into bag-of-words text.
//!
//! Field order inside a document does not change similarity, but it is kept
//! stable so the same record always produces the same string.

use crate::models::{Candidate, Posting};

/// `skills + " " + non-empty project descriptions`.
pub fn candidate_document(candidate: &Candidate) -> String {
    let projects = candidate
        .projects
        .iter()
        .filter_map(|p| p.description.as_deref())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} {}", candidate.skills.joined(), projects)
}

/// `role + " " + description + " " + required skills`.
pub fn posting_document(posting: &Posting) -> String {
    format!(
        "{} {} {}",
        posting.role,
        posting.description.as_deref().unwrap_or(""),
        posting.required_skills.joined()
    )
}
