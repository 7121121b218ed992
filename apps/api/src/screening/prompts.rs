// Prompt templates for resume screening.

/// Screening prompt. `{job_description}`, `{resume_text}` and
/// `{json_only_instruction}` are filled in a single pass before sending.
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"
You are an AI hiring agent. Compare the following job description and resume.

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}

Score the resume on:
1. Overall match score (0-100)
2. Fit percentage (0-100)
3. Strengths (3-5 bullet points)
4. Weaknesses (3-5 bullet points)

{json_only_instruction}

Format:
{
  "score": <number>,
  "fit_percentage": <number>,
  "strengths": "<string>",
  "weaknesses": "<string>",
  "raw_explanation": "<string>"
}
"#;
