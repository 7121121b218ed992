//! Response parser. Turns a raw, possibly fenced model completion into an
//! `Evaluation`. Never returns an error: malformed output becomes `Degraded`.

use serde_json::{Map, Value};

use crate::screening::{Evaluation, EvaluationResult};

const FENCE: &str = "```";

/// Parses a screening completion.
///
/// Fence markers are removed anywhere in the text. Missing numeric fields
/// default to 0, missing text fields to "", and a missing `raw_explanation`
/// to the cleaned completion itself.
pub fn parse_evaluation(raw_completion: &str) -> Evaluation {
    let cleaned = strip_code_fences(raw_completion);

    let object = match decode_object(&cleaned) {
        Ok(object) => object,
        Err(reason) => return Evaluation::model_failure(reason),
    };

    match build_result(&object, &cleaned) {
        Ok(result) => Evaluation::Scored(result),
        Err(reason) => Evaluation::model_failure(reason),
    }
}

/// Removes every ```` ``` ```` marker together with a directly following
/// `json` tag (any case), then trims.
pub(crate) fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(FENCE) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + FENCE.len()..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

fn decode_object(cleaned: &str) -> Result<Map<String, Value>, String> {
    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => value,
        Err(first_err) => match outermost_braces(cleaned) {
            // Prose around the object: give the braced span one more try.
            Some(span) if span.len() < cleaned.len() => serde_json::from_str::<Value>(span)
                .map_err(|_| first_err.to_string())?,
            _ => return Err(first_err.to_string()),
        },
    };

    match value {
        Value::Object(object) => Ok(object),
        other => Err(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        )),
    }
}

fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn build_result(object: &Map<String, Value>, cleaned: &str) -> Result<EvaluationResult, String> {
    Ok(EvaluationResult {
        score: coerce_int(object, "score")?,
        fit_percentage: coerce_int(object, "fit_percentage")?,
        strengths: coerce_text(object, "strengths").unwrap_or_default(),
        weaknesses: coerce_text(object, "weaknesses").unwrap_or_default(),
        raw_explanation: coerce_text(object, "raw_explanation")
            .unwrap_or_else(|| cleaned.to_string()),
    })
}

/// Absent → 0. Integers pass, floats truncate, numeric strings parse.
fn coerce_int(object: &Map<String, Value>, field: &str) -> Result<i32, String> {
    let Some(value) = object.get(field) else {
        return Ok(0);
    };

    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };

    parsed
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| format!("invalid value for '{field}': {value}"))
}

/// Absent or null → None. Arrays of strings are joined one per line.
fn coerce_text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Some(other.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
