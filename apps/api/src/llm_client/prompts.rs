// Cross-cutting prompt fragments. Each feature keeps its own prompts.rs
// alongside it and pulls shared wording from here.

/// Output-format instruction appended to every prompt that expects JSON back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Return ONLY valid JSON. Do NOT include triple backticks or code fences. \
Do NOT include any text outside the JSON object.";
