use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::job::{JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow};
use crate::models::screening::{NewScreeningResult, RankedScreeningResult, ScreeningResultRow};
use crate::store::HiringStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_result_row<'e>(
    executor: impl PgExecutor<'e>,
    result: &NewScreeningResult,
) -> Result<ScreeningResultRow, sqlx::Error> {
    sqlx::query_as::<_, ScreeningResultRow>(
        r#"
        INSERT INTO screening_results
            (job_id, resume_id, score, fit_percentage, strengths, weaknesses, raw_explanation)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(result.job_id)
    .bind(result.resume_id)
    .bind(result.score)
    .bind(result.fit_percentage)
    .bind(&result.strengths)
    .bind(&result.weaknesses)
    .bind(&result.raw_explanation)
    .fetch_one(executor)
    .await
}

#[async_trait]
impl HiringStore for PgStore {
    async fn create_job(&self, job: NewJob) -> Result<JobRow> {
        Ok(sqlx::query_as::<_, JobRow>(
            "INSERT INTO job_descriptions (admin_id, title, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(job.admin_id)
        .bind(&job.title)
        .bind(&job.description)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobRow>> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM job_descriptions WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn jobs_for_admin(&self, admin_id: Uuid) -> Result<Vec<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT * FROM job_descriptions WHERE admin_id = $1 ORDER BY created_at DESC",
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<ResumeRow> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "INSERT INTO resumes (user_id, file_path, original_filename) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(resume.user_id)
        .bind(&resume.file_path)
        .bind(&resume.original_filename)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn resumes_newest_first(&self) -> Result<Vec<ResumeRow>> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_results(&self, job_id: Uuid) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM screening_results WHERE job_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted)
    }

    async fn insert_result(&self, result: NewScreeningResult) -> Result<ScreeningResultRow> {
        Ok(insert_result_row(&self.pool, &result).await?)
    }

    async fn replace_results(
        &self,
        job_id: Uuid,
        results: Vec<NewScreeningResult>,
    ) -> Result<Vec<ScreeningResultRow>> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM screening_results WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut rows = Vec::with_capacity(results.len());
        for result in &results {
            let row = insert_result_row(&mut *tx, result)
                .await
                .with_context(|| format!("Failed to insert result for resume {}", result.resume_id))?;
            rows.push(row);
        }

        tx.commit().await?;
        info!(
            "Replaced {deleted} screening results with {} for job {job_id}",
            rows.len()
        );
        Ok(rows)
    }

    async fn ranked_results(&self, job_id: Uuid) -> Result<Vec<RankedScreeningResult>> {
        Ok(sqlx::query_as::<_, RankedScreeningResult>(
            r#"
            SELECT sr.*, r.original_filename, r.user_id
            FROM screening_results sr
            JOIN resumes r ON r.id = sr.resume_id
            WHERE sr.job_id = $1
            ORDER BY sr.score DESC, sr.created_at ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
