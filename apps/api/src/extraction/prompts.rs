// All LLM prompt constants for the CV extraction module.

/// System prompt for work-experience extraction — enforces JSON-only output.
pub const EXTRACT_SYSTEM: &str =
    "You are a helpful assistant that extracts work experience from CV text. \
    You MUST respond with valid JSON only — a JSON array of work experience objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Extraction prompt template. Replace `{cv_text}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract every work experience from the CV text below.

Return a JSON array with this EXACT shape for each experience (no extra fields):
[
  {
    "title": "Job Title",
    "company": "Company Name",
    "startDate": "YYYY-MM-DD or YYYY",
    "endDate": "YYYY-MM-DD or YYYY, or null if this is the current position",
    "description": "Brief description of the role"
  }
]

Rules:
- `title`, `company` and `startDate` must never be empty.
- Use `null` for `endDate` when the person still holds the position.
- Preserve the order the experiences appear in the CV.
- If the CV contains no work experience at all, return an empty array: []

CV TEXT:
{cv_text}"#;
