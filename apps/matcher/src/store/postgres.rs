//! Read-only queries over the host application's relational tables:
//! `student`, `student_project`, `job_posting` and `job_application`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::{Candidate, CandidateId, Posting, PostingId, Project, SkillList};
use crate::store::RecordStore;

#[derive(Debug, Clone, FromRow)]
struct StudentRow {
    id: i32,
    full_name: String,
    cgpa: Option<f64>,
    skills: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct ProjectRow {
    project_title: String,
    description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct PostingRow {
    id: i32,
    company_id: i32,
    job_role: String,
    description: Option<String>,
    required_skills: Option<String>,
    cgpa_required: f64,
    location: String,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    contact_email: Option<String>,
    contact_mobile: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl From<PostingRow> for Posting {
    fn from(row: PostingRow) -> Self {
        Posting {
            id: row.id.into(),
            company_id: Some(row.company_id.into()),
            role: row.job_role,
            description: row.description,
            required_skills: SkillList::decode(row.required_skills.as_deref()),
            min_aptitude: row.cgpa_required,
            location: row.location,
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            contact_email: row.contact_email,
            contact_mobile: row.contact_mobile,
            created_at: row.created_at.map(|t| t.and_utc()),
        }
    }
}

const POSTING_COLUMNS: &str = "id, company_id, job_role, description, required_skills, cgpa_required, \
     location, salary_min, salary_max, contact_email, contact_mobile, created_at";

/// Store over the host's PostgreSQL database. Never writes.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_candidate(&self, student: StudentRow) -> Result<Candidate, AppError> {
        let projects = sqlx::query_as::<_, ProjectRow>(
            "SELECT project_title, description FROM student_project WHERE student_id = $1 ORDER BY id",
        )
        .bind(student.id)
        .fetch_all(&self.pool)
        .await?;

        let applied: Vec<i32> =
            sqlx::query_scalar("SELECT job_id FROM job_application WHERE student_id = $1")
                .bind(student.id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Candidate {
            id: student.id.into(),
            full_name: student.full_name,
            skills: SkillList::decode(student.skills.as_deref()),
            projects: projects
                .into_iter()
                .map(|p| Project {
                    title: p.project_title,
                    description: p.description,
                })
                .collect(),
            aptitude: student.cgpa,
            applied_posting_ids: applied.into_iter().map(PostingId::from).collect::<BTreeSet<_>>(),
        })
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, AppError> {
        let Ok(id) = i32::try_from(id) else {
            return Ok(None);
        };
        let student = sqlx::query_as::<_, StudentRow>(
            "SELECT id, full_name, cgpa, skills FROM student WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match student {
            Some(student) => Ok(Some(self.load_candidate(student).await?)),
            None => Ok(None),
        }
    }

    async fn posting(&self, id: PostingId) -> Result<Option<Posting>, AppError> {
        let Ok(id) = i32::try_from(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, PostingRow>(&format!(
            "SELECT {POSTING_COLUMNS} FROM job_posting WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Posting::from))
    }

    async fn postings(&self) -> Result<Vec<Posting>, AppError> {
        let rows = sqlx::query_as::<_, PostingRow>(&format!(
            "SELECT {POSTING_COLUMNS} FROM job_posting ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Posting::from).collect())
    }

    async fn applicants(&self, posting_id: PostingId) -> Result<Vec<Candidate>, AppError> {
        let Ok(posting_id) = i32::try_from(posting_id) else {
            return Ok(Vec::new());
        };
        let students = sqlx::query_as::<_, StudentRow>(
            "SELECT s.id, s.full_name, s.cgpa, s.skills \
             FROM job_application a JOIN student s ON s.id = a.student_id \
             WHERE a.job_id = $1 \
             ORDER BY a.applied_at ASC, a.id ASC",
        )
        .bind(posting_id)
        .fetch_all(&self.pool)
        .await?;

        let mut candidates = Vec::with_capacity(students.len());
        for student in students {
            candidates.push(self.load_candidate(student).await?);
        }
        Ok(candidates)
    }
}
