//! In-memory fakes for the store, blob storage, extractor, and model.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::llm_client::{CompletionModel, LlmError};
use crate::models::job::{JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow};
use crate::models::screening::{
    NewScreeningResult, RankedScreeningResult, ResumeSummary, ScreeningResultRow,
};
use crate::screening::extract::{ExtractError, TextExtractor};
use crate::storage::{ResumeStorage, StorageError};
use crate::store::HiringStore;

pub fn resume_at(user_id: Uuid, name: &str, created_at: DateTime<Utc>) -> ResumeRow {
    ResumeRow {
        id: Uuid::new_v4(),
        user_id,
        file_path: format!("{user_id}/{name}"),
        original_filename: name.to_string(),
        created_at,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    CreateJob,
    FetchJob,
    ListJobs,
    CreateResume,
    ListResumes,
    DeleteResults,
    InsertResult,
    ReplaceResults,
    RankedResults,
}

impl StoreOp {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            StoreOp::CreateJob
                | StoreOp::CreateResume
                | StoreOp::DeleteResults
                | StoreOp::InsertResult
                | StoreOp::ReplaceResults
        )
    }
}

#[derive(Default)]
struct StoreState {
    jobs: Vec<JobRow>,
    resumes: Vec<ResumeRow>,
    results: Vec<ScreeningResultRow>,
    ops: Vec<StoreOp>,
    fail_inserts: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn add_job(&self, title: &str, description: &str) -> JobRow {
        let job = JobRow {
            id: Uuid::new_v4(),
            admin_id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.with_state(|s| s.jobs.push(job.clone()));
        job
    }

    pub fn add_resume(&self, resume: ResumeRow) {
        self.with_state(|s| s.resumes.push(resume));
    }

    pub fn seed_result(&self, job_id: Uuid, resume_id: Uuid) -> ScreeningResultRow {
        self.seed_scored(job_id, resume_id, 50, Utc::now())
    }

    pub fn seed_scored(
        &self,
        job_id: Uuid,
        resume_id: Uuid,
        score: i32,
        created_at: DateTime<Utc>,
    ) -> ScreeningResultRow {
        let row = ScreeningResultRow {
            created_at,
            ..to_row(&NewScreeningResult {
                job_id,
                resume_id,
                score,
                fit_percentage: score,
                strengths: "seeded".to_string(),
                weaknesses: "seeded".to_string(),
                raw_explanation: "seeded".to_string(),
            })
        };
        self.with_state(|s| s.results.push(row.clone()));
        row
    }

    pub fn results_for(&self, job_id: Uuid) -> Vec<ScreeningResultRow> {
        self.with_state(|s| {
            s.results
                .iter()
                .filter(|r| r.job_id == job_id)
                .cloned()
                .collect()
        })
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.with_state(|s| s.ops.clone())
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.with_state(|s| s.fail_inserts = fail);
    }
}

/// Postgres `TEXT` columns refuse NUL bytes.
fn reject_nul(result: &NewScreeningResult) -> Result<()> {
    let fields = [&result.strengths, &result.weaknesses, &result.raw_explanation];
    if fields.iter().any(|f| f.contains('\0')) {
        return Err(anyhow!("invalid byte sequence for encoding \"UTF8\": 0x00"));
    }
    Ok(())
}

fn to_row(result: &NewScreeningResult) -> ScreeningResultRow {
    ScreeningResultRow {
        id: Uuid::new_v4(),
        job_id: result.job_id,
        resume_id: result.resume_id,
        score: result.score,
        fit_percentage: result.fit_percentage,
        strengths: result.strengths.clone(),
        weaknesses: result.weaknesses.clone(),
        raw_explanation: result.raw_explanation.clone(),
        created_at: Utc::now(),
    }
}

fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut items = items.to_vec();
    // stable: equal timestamps keep arrival order
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl HiringStore for MemoryStore {
    async fn create_job(&self, job: NewJob) -> Result<JobRow> {
        let row = JobRow {
            id: Uuid::new_v4(),
            admin_id: job.admin_id,
            title: job.title,
            description: job.description,
            created_at: Utc::now(),
        };
        self.with_state(|s| {
            s.ops.push(StoreOp::CreateJob);
            s.jobs.push(row.clone());
        });
        Ok(row)
    }

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobRow>> {
        Ok(self.with_state(|s| {
            s.ops.push(StoreOp::FetchJob);
            s.jobs.iter().find(|j| j.id == job_id).cloned()
        }))
    }

    async fn jobs_for_admin(&self, admin_id: Uuid) -> Result<Vec<JobRow>> {
        Ok(self.with_state(|s| {
            s.ops.push(StoreOp::ListJobs);
            let owned: Vec<JobRow> = s
                .jobs
                .iter()
                .filter(|j| j.admin_id == admin_id)
                .cloned()
                .collect();
            newest_first(&owned, |j| j.created_at)
        }))
    }

    async fn create_resume(&self, resume: NewResume) -> Result<ResumeRow> {
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            file_path: resume.file_path,
            original_filename: resume.original_filename,
            created_at: Utc::now(),
        };
        self.with_state(|s| {
            s.ops.push(StoreOp::CreateResume);
            s.resumes.push(row.clone());
        });
        Ok(row)
    }

    async fn resumes_newest_first(&self) -> Result<Vec<ResumeRow>> {
        Ok(self.with_state(|s| {
            s.ops.push(StoreOp::ListResumes);
            newest_first(&s.resumes, |r| r.created_at)
        }))
    }

    async fn resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>> {
        Ok(self.with_state(|s| {
            s.ops.push(StoreOp::ListResumes);
            let owned: Vec<ResumeRow> = s
                .resumes
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect();
            newest_first(&owned, |r| r.created_at)
        }))
    }

    async fn delete_results(&self, job_id: Uuid) -> Result<u64> {
        Ok(self.with_state(|s| {
            s.ops.push(StoreOp::DeleteResults);
            let before = s.results.len();
            s.results.retain(|r| r.job_id != job_id);
            (before - s.results.len()) as u64
        }))
    }

    async fn insert_result(&self, result: NewScreeningResult) -> Result<ScreeningResultRow> {
        self.with_state(|s| {
            s.ops.push(StoreOp::InsertResult);
            if s.fail_inserts {
                return Err(anyhow!("insert rejected"));
            }
            reject_nul(&result)?;
            let row = to_row(&result);
            s.results.push(row.clone());
            Ok(row)
        })
    }

    async fn replace_results(
        &self,
        job_id: Uuid,
        results: Vec<NewScreeningResult>,
    ) -> Result<Vec<ScreeningResultRow>> {
        self.with_state(|s| {
            s.ops.push(StoreOp::ReplaceResults);
            if s.fail_inserts {
                return Err(anyhow!("transaction rolled back"));
            }
            results.iter().try_for_each(reject_nul)?;
            s.results.retain(|r| r.job_id != job_id);
            let rows: Vec<ScreeningResultRow> = results.iter().map(to_row).collect();
            s.results.extend(rows.iter().cloned());
            Ok(rows)
        })
    }

    async fn ranked_results(&self, job_id: Uuid) -> Result<Vec<RankedScreeningResult>> {
        Ok(self.with_state(|s| {
            s.ops.push(StoreOp::RankedResults);
            let mut ranked: Vec<RankedScreeningResult> = s
                .results
                .iter()
                .filter(|r| r.job_id == job_id)
                .filter_map(|r| {
                    let resume = s.resumes.iter().find(|res| res.id == r.resume_id)?;
                    Some(RankedScreeningResult {
                        result: r.clone(),
                        resumes: ResumeSummary {
                            original_filename: resume.original_filename.clone(),
                            user_id: resume.user_id,
                        },
                    })
                })
                .collect();
            ranked.sort_by(|a, b| {
                b.result
                    .score
                    .cmp(&a.result.score)
                    .then(a.result.created_at.cmp(&b.result.created_at))
            });
            ranked
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryStorage
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, Bytes>>,
    stalled: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    pub fn put(&self, path: &str, body: &str) {
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), Bytes::from(body.to_string()));
    }

    /// Downloads of `path` never complete.
    pub fn stall(&self, path: &str) {
        self.stalled.lock().unwrap().insert(path.to_string());
    }
}

#[async_trait]
impl ResumeStorage for MemoryStorage {
    async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
        let stalled = self.stalled.lock().unwrap().contains(path);
        if stalled {
            std::future::pending::<()>().await;
        }
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::Download {
                path: path.to_string(),
                message: "NoSuchKey".to_string(),
            })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StaticExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Treats blobs as UTF-8 text; the `CORRUPT` body fails extraction.
pub struct StaticExtractor;

impl StaticExtractor {
    pub const CORRUPT: &'static str = "%CORRUPT%";
}

#[async_trait]
impl TextExtractor for StaticExtractor {
    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractError> {
        if bytes.as_ref() == Self::CORRUPT.as_bytes() {
            return Err(ExtractError::Pdf("unreadable xref table".to_string()));
        }
        String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ScriptedModel
// ────────────────────────────────────────────────────────────────────────────

type Responder = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;

/// Model fake that answers each prompt through a closure and records prompts.
#[derive(Clone)]
pub struct ScriptedModel {
    responder: Arc<Responder>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new(
        responder: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn replying(completion: &str) -> Self {
        let completion = completion.to_string();
        Self::new(move |_| Ok(completion.clone()))
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| {
            Err(LlmError::Api {
                status: 429,
                message: message.clone(),
            })
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(prompt)
    }
}
