use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::skills::SkillList;

pub type PostingId = i64;

/// Read-only snapshot of a job posting.
///
/// Company, salary and contact fields travel with the posting so responses can
/// echo them back, but no scoring step reads them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Posting {
    pub id: PostingId,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: SkillList,
    #[serde(default)]
    pub min_aptitude: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_mobile: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Posting {
    /// Location tags match after trimming, ignoring case.
    pub fn in_location(&self, location: &str) -> bool {
        self.location.trim().eq_ignore_ascii_case(location.trim())
    }
}
