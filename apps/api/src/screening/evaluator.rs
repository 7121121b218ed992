//! Evaluator: builds the screening prompt, calls the model, and hands the
//! completion to the parser. Every failure becomes a degraded evaluation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CompletionModel, LlmError};
use crate::screening::parser::parse_evaluation;
use crate::screening::prompts::SCREENING_PROMPT_TEMPLATE;
use crate::screening::Evaluation;

#[derive(Clone)]
pub struct Evaluator {
    model: Arc<dyn CompletionModel>,
    timeout: Duration,
}

impl Evaluator {
    pub fn new(model: Arc<dyn CompletionModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub async fn evaluate(&self, job_description: &str, resume_text: &str) -> Evaluation {
        let prompt = build_prompt(job_description, resume_text);

        let completion =
            match tokio::time::timeout(self.timeout, self.model.complete(&prompt)).await {
                Ok(Ok(completion)) => completion,
                Ok(Err(e)) => {
                    warn!("Model call failed: {e}");
                    return Evaluation::model_failure(e.to_string());
                }
                Err(_) => {
                    let e = LlmError::Timeout(self.timeout);
                    warn!("{e}");
                    return Evaluation::model_failure(e.to_string());
                }
            };

        let evaluation = parse_evaluation(&completion);
        match &evaluation {
            Evaluation::Scored(result) => debug!(
                "Model scored resume {}/100 (fit {}%)",
                result.score, result.fit_percentage
            ),
            Evaluation::Degraded { reason, .. } => {
                warn!("Unusable model response ({reason}): {completion}")
            }
        }
        evaluation
    }
}

pub(crate) fn build_prompt(job_description: &str, resume_text: &str) -> String {
    fill_template(
        SCREENING_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_text", resume_text),
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Substitutes `{key}` placeholders in one left-to-right pass. Inserted values
/// are never rescanned, and braces that are not a known placeholder are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(idx) = rest.find('{') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        let placeholder = values.iter().find(|(key, _)| {
            rest[1..]
                .strip_prefix(key)
                .is_some_and(|tail| tail.starts_with('}'))
        });
        match placeholder {
            Some((key, value)) => {
                out.push_str(value);
                rest = &rest[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
