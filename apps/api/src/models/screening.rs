use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::screening::EvaluationResult;

/// A persisted screening result. All rows for a job are replaced on every run.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningResultRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub resume_id: Uuid,
    pub score: i32,
    pub fit_percentage: i32,
    pub strengths: String,
    pub weaknesses: String,
    pub raw_explanation: String,
    pub created_at: DateTime<Utc>,
}

/// A result waiting to be inserted; ids and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScreeningResult {
    pub job_id: Uuid,
    pub resume_id: Uuid,
    pub score: i32,
    pub fit_percentage: i32,
    pub strengths: String,
    pub weaknesses: String,
    pub raw_explanation: String,
}

impl NewScreeningResult {
    /// Text fields are model output; NUL is dropped since Postgres `TEXT` rejects it.
    pub fn new(job_id: Uuid, resume_id: Uuid, evaluation: EvaluationResult) -> Self {
        Self {
            job_id,
            resume_id,
            score: evaluation.score,
            fit_percentage: evaluation.fit_percentage,
            strengths: strip_nul(evaluation.strengths),
            weaknesses: strip_nul(evaluation.weaknesses),
            raw_explanation: strip_nul(evaluation.raw_explanation),
        }
    }
}

fn strip_nul(text: String) -> String {
    if text.contains('\0') {
        text.replace('\0', "")
    } else {
        text
    }
}

/// Resume metadata nested into ranked results (`resumes.original_filename`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSummary {
    pub original_filename: String,
    pub user_id: Uuid,
}

/// A screening result joined with the resume it scored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankedScreeningResult {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub result: ScreeningResultRow,
    #[sqlx(flatten)]
    pub resumes: ResumeSummary,
}
