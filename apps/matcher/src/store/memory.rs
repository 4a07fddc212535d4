use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Candidate, CandidateId, Posting, PostingId};
use crate::store::RecordStore;

/// Shape of a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub postings: Vec<Posting>,
}

/// Store backed by records held in memory, loaded once from a JSON seed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    candidates: Vec<Candidate>,
    postings: Vec<Posting>,
}

impl InMemoryRecordStore {
    pub fn new(seed: Seed) -> Self {
        Self {
            candidates: seed.candidates,
            postings: seed.postings,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        let seed: Seed = serde_json::from_str(&raw)
            .with_context(|| format!("Seed file {} is not valid JSON", path.display()))?;
        Ok(Self::new(seed))
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.candidates.len(), self.postings.len())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, AppError> {
        Ok(self.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn posting(&self, id: PostingId) -> Result<Option<Posting>, AppError> {
        Ok(self.postings.iter().find(|p| p.id == id).cloned())
    }

    async fn postings(&self) -> Result<Vec<Posting>, AppError> {
        Ok(self.postings.clone())
    }

    /// Seed order stands in for application order.
    async fn applicants(&self, posting_id: PostingId) -> Result<Vec<Candidate>, AppError> {
        Ok(self
            .candidates
            .iter()
            .filter(|c| c.has_applied(posting_id))
            .cloned()
            .collect())
    }
}
