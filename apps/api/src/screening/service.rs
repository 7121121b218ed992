//! Screening orchestrator. Runs one screening pass for a job.
//!
//! Flow: load job → load resumes (newest first) → keep the latest per
//! candidate → for each: download → extract text → evaluate → persist the
//! new result set in place of the job's previous one.
//!
//! Per-resume failures never abort the run; they are persisted as sentinel
//! rows. Only a failure to persist is fatal.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::job::JobRow;
use crate::models::resume::ResumeRow;
use crate::models::screening::{NewScreeningResult, ScreeningResultRow};
use crate::screening::dedup::latest_per_candidate;
use crate::screening::extract::TextExtractor;
use crate::screening::locks::JobLocks;
use crate::screening::{Evaluation, Evaluator, ReplaceMode, ScreeningError};
use crate::storage::{ResumeStorage, StorageError};
use crate::store::HiringStore;

#[derive(Debug, Clone, Copy)]
pub struct ScreeningOptions {
    pub replace_mode: ReplaceMode,
    /// Bound on a single resume download.
    pub storage_timeout: Duration,
}

impl Default for ScreeningOptions {
    fn default() -> Self {
        Self {
            replace_mode: ReplaceMode::default(),
            storage_timeout: Duration::from_secs(30),
        }
    }
}

pub struct ScreeningService {
    store: Arc<dyn HiringStore>,
    storage: Arc<dyn ResumeStorage>,
    extractor: Arc<dyn TextExtractor>,
    evaluator: Evaluator,
    locks: JobLocks,
    options: ScreeningOptions,
}

impl ScreeningService {
    pub fn new(
        store: Arc<dyn HiringStore>,
        storage: Arc<dyn ResumeStorage>,
        extractor: Arc<dyn TextExtractor>,
        evaluator: Evaluator,
        options: ScreeningOptions,
    ) -> Self {
        Self {
            store,
            storage,
            extractor,
            evaluator,
            locks: JobLocks::new(),
            options,
        }
    }

    /// Runs screening for `job_id` and returns the persisted rows, one per
    /// candidate, in deduplicated-resume order.
    ///
    /// `JobNotFound` and `NoResumes` are returned before anything is deleted.
    pub async fn run(&self, job_id: Uuid) -> Result<Vec<ScreeningResultRow>, ScreeningError> {
        let _guard = self.locks.acquire(job_id).await;

        // Step 1: Load job
        let job = self
            .store
            .fetch_job(job_id)
            .await
            .map_err(ScreeningError::Persistence)?
            .ok_or(ScreeningError::JobNotFound(job_id))?;

        // Step 2: Load resumes, newest first
        let resumes = self
            .store
            .resumes_newest_first()
            .await
            .map_err(ScreeningError::Persistence)?;
        if resumes.is_empty() {
            return Err(ScreeningError::NoResumes);
        }

        // Step 3: One resume per candidate
        let total = resumes.len();
        let resumes = latest_per_candidate(resumes);
        info!(
            "Screening job {job_id} ('{}'): {} candidates from {total} resumes ({:?} mode)",
            job.title,
            resumes.len(),
            self.options.replace_mode
        );

        match self.options.replace_mode {
            ReplaceMode::Transactional => self.run_transactional(&job, &resumes).await,
            ReplaceMode::Legacy => self.run_legacy(&job, &resumes).await,
        }
    }

    async fn run_transactional(
        &self,
        job: &JobRow,
        resumes: &[ResumeRow],
    ) -> Result<Vec<ScreeningResultRow>, ScreeningError> {
        let results = self.evaluate_all(job, resumes).await;

        let rows = self
            .store
            .replace_results(job.id, results)
            .await
            .map_err(|e| {
                error!("Failed to replace results for job {}: {e:?}", job.id);
                ScreeningError::Persistence(e)
            })?;

        info!("Screening job {} complete: {} results", job.id, rows.len());
        Ok(rows)
    }

    async fn run_legacy(
        &self,
        job: &JobRow,
        resumes: &[ResumeRow],
    ) -> Result<Vec<ScreeningResultRow>, ScreeningError> {
        // Step 4: Invalidate prior results before any evaluation completes
        let deleted = self
            .store
            .delete_results(job.id)
            .await
            .map_err(ScreeningError::Persistence)?;
        info!("Deleted {deleted} previous results for job {}", job.id);

        // Step 5: Evaluate
        let results = self.evaluate_all(job, resumes).await;

        // Step 6: Persist row by row
        let mut rows = Vec::with_capacity(results.len());
        for result in results {
            let resume_id = result.resume_id;
            let row = self.store.insert_result(result).await.map_err(|e| {
                error!(
                    "Failed to insert result for resume {resume_id} of job {}: {e:?}",
                    job.id
                );
                ScreeningError::Persistence(e)
            })?;
            rows.push(row);
        }

        info!("Screening job {} complete: {} results", job.id, rows.len());
        Ok(rows)
    }

    async fn evaluate_all(&self, job: &JobRow, resumes: &[ResumeRow]) -> Vec<NewScreeningResult> {
        let mut results = Vec::with_capacity(resumes.len());
        let mut degraded = 0usize;

        for resume in resumes {
            let evaluation = self.screen_resume(&job.description, resume).await;
            if evaluation.is_degraded() {
                degraded += 1;
            } else {
                info!(
                    "Scored {}: {}/100",
                    resume.original_filename,
                    evaluation.result().score
                );
            }
            results.push(NewScreeningResult::new(
                job.id,
                resume.id,
                evaluation.into_result(),
            ));
        }

        if degraded > 0 {
            warn!(
                "{degraded} of {} resumes for job {} produced fallback results",
                resumes.len(),
                job.id
            );
        }
        results
    }

    /// Download → extract → evaluate for one resume. Never fails.
    async fn screen_resume(&self, job_description: &str, resume: &ResumeRow) -> Evaluation {
        let timeout = self.options.storage_timeout;
        let bytes = match tokio::time::timeout(timeout, self.storage.download(&resume.file_path))
            .await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => return self.resume_failed(resume, e.to_string()),
            Err(_) => {
                let e = StorageError::Timeout {
                    path: resume.file_path.clone(),
                    secs: timeout.as_secs(),
                };
                return self.resume_failed(resume, e.to_string());
            }
        };
        info!(
            "Downloaded {} => {} bytes",
            resume.original_filename,
            bytes.len()
        );

        let resume_text = match self.extractor.extract(bytes).await {
            Ok(text) => text,
            Err(e) => return self.resume_failed(resume, e.to_string()),
        };

        self.evaluator.evaluate(job_description, &resume_text).await
    }

    fn resume_failed(&self, resume: &ResumeRow, reason: String) -> Evaluation {
        warn!(
            "Error processing resume {} ({}): {reason}",
            resume.id, resume.original_filename
        );
        Evaluation::processing_failure(reason)
    }
}
