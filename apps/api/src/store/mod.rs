//! Relational storage for jobs, resumes, and screening results.
//!
//! `HiringStore` is the seam between the HTTP/screening layers and PostgreSQL.
//! `AppState` carries it as `Arc<dyn HiringStore>`.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::{JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow};
use crate::models::screening::{NewScreeningResult, RankedScreeningResult, ScreeningResultRow};

pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait HiringStore: Send + Sync {
    async fn create_job(&self, job: NewJob) -> Result<JobRow>;

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobRow>>;

    /// Jobs owned by one admin, newest first.
    async fn jobs_for_admin(&self, admin_id: Uuid) -> Result<Vec<JobRow>>;

    async fn create_resume(&self, resume: NewResume) -> Result<ResumeRow>;

    /// Every resume of every candidate, newest first.
    async fn resumes_newest_first(&self) -> Result<Vec<ResumeRow>>;

    /// One candidate's resumes, newest first.
    async fn resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>>;

    /// Deletes every result row for the job. Returns the number removed.
    async fn delete_results(&self, job_id: Uuid) -> Result<u64>;

    async fn insert_result(&self, result: NewScreeningResult) -> Result<ScreeningResultRow>;

    /// Deletes the job's results and inserts `results` as one atomic unit.
    /// Returned rows keep the order of `results`.
    async fn replace_results(
        &self,
        job_id: Uuid,
        results: Vec<NewScreeningResult>,
    ) -> Result<Vec<ScreeningResultRow>>;

    /// Results joined with resume metadata, highest score first.
    async fn ranked_results(&self, job_id: Uuid) -> Result<Vec<RankedScreeningResult>>;
}
