// Resume screening: scores every candidate's latest resume against a job
// description with the generative model and persists the ranked result set.
// Model access goes through llm_client::CompletionModel only.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod dedup;
pub mod evaluator;
pub mod extract;
pub mod handlers;
pub mod locks;
pub mod parser;
pub mod prompts;
pub mod service;

pub use evaluator::Evaluator;
pub use service::{ScreeningOptions, ScreeningService};

/// Strengths text of a result whose model response could not be used.
pub const MODEL_FAILURE_STRENGTHS: &str = "Error";
/// Explanation text of a result whose model response could not be used.
pub const MODEL_FAILURE_EXPLANATION: &str = "AI failed to parse response.";
/// Strengths text of a result whose resume could not be downloaded, read, or evaluated.
pub const PROCESSING_FAILURE_STRENGTHS: &str = "Error processing resume";
/// Explanation text of a result whose resume could not be downloaded, read, or evaluated.
pub const PROCESSING_FAILURE_EXPLANATION: &str = "AI evaluation failed";

/// One resume's evaluation. Always fully populated, including on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Overall match, 0-100 by convention (not enforced).
    pub score: i32,
    /// 0-100 by convention (not enforced).
    pub fit_percentage: i32,
    pub strengths: String,
    pub weaknesses: String,
    pub raw_explanation: String,
}

impl EvaluationResult {
    /// Sentinel for a model call or model response that failed.
    pub fn model_failure(reason: impl Into<String>) -> Self {
        Self {
            score: 0,
            fit_percentage: 0,
            strengths: MODEL_FAILURE_STRENGTHS.to_string(),
            weaknesses: reason.into(),
            raw_explanation: MODEL_FAILURE_EXPLANATION.to_string(),
        }
    }

    /// Sentinel for a resume that failed before or during evaluation.
    pub fn processing_failure(reason: impl Into<String>) -> Self {
        Self {
            score: 0,
            fit_percentage: 0,
            strengths: PROCESSING_FAILURE_STRENGTHS.to_string(),
            weaknesses: reason.into(),
            raw_explanation: PROCESSING_FAILURE_EXPLANATION.to_string(),
        }
    }
}

/// Outcome of evaluating one resume. `Degraded` carries the sentinel that is
/// persisted in place of a real evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Scored(EvaluationResult),
    Degraded {
        reason: String,
        fallback: EvaluationResult,
    },
}

impl Evaluation {
    pub(crate) fn model_failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Evaluation::Degraded {
            fallback: EvaluationResult::model_failure(reason.clone()),
            reason,
        }
    }

    pub(crate) fn processing_failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Evaluation::Degraded {
            fallback: EvaluationResult::processing_failure(reason.clone()),
            reason,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Evaluation::Degraded { .. })
    }

    pub fn result(&self) -> &EvaluationResult {
        match self {
            Evaluation::Scored(result) => result,
            Evaluation::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_result(self) -> EvaluationResult {
        match self {
            Evaluation::Scored(result) => result,
            Evaluation::Degraded { fallback, .. } => fallback,
        }
    }
}

/// How a run replaces the previous result set of its job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMode {
    /// Evaluate everything first, then delete and insert in one transaction.
    #[default]
    Transactional,
    /// Delete before the evaluation loop and insert row by row afterwards.
    /// A crash in between leaves the job with no results.
    Legacy,
}

impl FromStr for ReplaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" => Ok(ReplaceMode::Transactional),
            "legacy" => Ok(ReplaceMode::Legacy),
            other => Err(format!("unknown replace mode '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("Job description not found: {0}")]
    JobNotFound(Uuid),

    #[error("No resumes found")]
    NoResumes,

    #[error("Failed to persist screening results: {0}")]
    Persistence(anyhow::Error),
}
