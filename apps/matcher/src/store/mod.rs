//! Record Store — read-only access to the host application's candidates and postings.
//!
//! The engine never fetches anything itself. Handlers load the records they
//! need through `AppState.store` (an `Arc<dyn RecordStore>`) and then hand
//! plain snapshots to `crate::matching`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{Candidate, CandidateId, Posting, PostingId};

pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, AppError>;

    async fn posting(&self, id: PostingId) -> Result<Option<Posting>, AppError>;

    /// The full catalog in a stable order.
    async fn postings(&self) -> Result<Vec<Posting>, AppError>;

    /// Candidates who applied to `posting_id`, earliest application first.
    async fn applicants(&self, posting_id: PostingId) -> Result<Vec<Candidate>, AppError>;
}
