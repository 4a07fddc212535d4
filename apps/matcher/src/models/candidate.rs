use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::posting::PostingId;
use crate::models::skills::SkillList;

pub type CandidateId = i64;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Read-only snapshot of a candidate, supplied by the record store or the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub skills: SkillList,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Cumulative grade average. `None` and `0.0` both count as "not recorded".
    #[serde(default)]
    pub aptitude: Option<f64>,
    #[serde(default)]
    pub applied_posting_ids: BTreeSet<PostingId>,
}

impl Candidate {
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn has_applied(&self, posting_id: PostingId) -> bool {
        self.applied_posting_ids.contains(&posting_id)
    }
}
