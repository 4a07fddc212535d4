pub mod candidate;
pub mod posting;
pub mod skills;

pub use candidate::{Candidate, CandidateId, Project};
pub use posting::{Posting, PostingId};
pub use skills::{normalize_skill, SkillList};
