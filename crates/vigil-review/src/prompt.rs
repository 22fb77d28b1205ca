use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use vigil_core::{GateError, Issue, ReviewVerdict, Severity, VerdictStatus};

const SYSTEM_PROMPT: &str =
    "You are a helpful code review assistant. Always respond with valid JSON.";

/// Build the system prompt for the review call.
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Build the per-file user prompt.
///
/// Instructs the model to check syntax, bugs, code quality, and security,
/// and to answer in exactly one of the two fixed JSON shapes.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vigil_review::prompt::build_review_prompt;
///
/// let prompt = build_review_prompt(Path::new("src/app.py"), "print('hi')");
/// assert!(prompt.contains("src/app.py"));
/// assert!(prompt.contains("NEEDS_CHANGES"));
/// ```
pub fn build_review_prompt(path: &Path, content: &str) -> String {
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    format!(
        r#"You are an expert code reviewer. Analyze the following code for syntax errors, bugs, and code quality issues.

File: {path}
Extension: {extension}

Code:
```
{content}
```

Provide a thorough analysis including:
1. Syntax errors (if any)
2. Potential bugs or runtime issues
3. Code quality and best practice suggestions
4. Security concerns (if applicable)

IMPORTANT: Format your response as valid JSON with this exact structure:
{{
    "status": "APPROVED",
    "issues": [],
    "summary": "Brief overall assessment"
}}

OR if there are issues:

{{
    "status": "NEEDS_CHANGES",
    "issues": [
        {{"line": 10, "severity": "error", "message": "Missing closing parenthesis"}},
        {{"line": 15, "severity": "warning", "message": "Variable 'x' is unused"}}
    ],
    "summary": "Found X issues that need attention"
}}

Severity levels: "error" (must fix), "warning" (should fix), "info" (suggestion)
"#,
        path = path.display(),
    )
}

type Extractor = fn(&str) -> Option<&str>;

/// Extraction strategies tried in order: a `json`-labeled fence, then any
/// fence, then the raw trimmed text.
const EXTRACTORS: &[Extractor] = &[labeled_fence, bare_fence];

/// Pull the JSON payload out of a possibly fenced model response.
///
/// # Examples
///
/// ```
/// use vigil_review::prompt::extract_json;
///
/// assert_eq!(extract_json("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(extract_json("```\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(extract_json("  {\"a\":1}  "), "{\"a\":1}");
/// ```
pub fn extract_json(response: &str) -> &str {
    for extract in EXTRACTORS {
        if let Some(inner) = extract(response) {
            return inner;
        }
    }
    response.trim()
}

fn labeled_fence(s: &str) -> Option<&str> {
    let start = s.find("```json")? + "```json".len();
    let rest = &s[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn bare_fence(s: &str) -> Option<&str> {
    let start = s.find("```")? + "```".len();
    let rest = &s[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

#[derive(Deserialize)]
struct RawVerdict {
    status: String,
    #[serde(default)]
    issues: Vec<RawIssue>,
    #[serde(default)]
    summary: String,
}

#[derive(Deserialize)]
struct RawIssue {
    line: Option<serde_json::Value>,
    severity: Option<String>,
    message: Option<String>,
}

/// Parse the model response into a [`ReviewVerdict`].
///
/// The `status` key is required and must carry one of the two wire
/// spellings; valid JSON that violates that shape is a parse failure, so the
/// caller's fail-closed conversion applies. Individual issues are normalized
/// leniently: a non-numeric line becomes "not applicable", an unknown
/// severity becomes `info`, a missing message gets a placeholder.
///
/// # Errors
///
/// Returns [`GateError::Serialization`] when the payload is not JSON, or
/// [`GateError::Llm`] when the JSON does not carry a recognized status.
///
/// # Examples
///
/// ```
/// use vigil_review::prompt::parse_verdict;
///
/// let v = parse_verdict(r#"{"status":"APPROVED","issues":[],"summary":"Looks fine"}"#).unwrap();
/// assert!(v.status.is_approved());
/// assert!(parse_verdict("not json").is_err());
/// ```
pub fn parse_verdict(response: &str) -> Result<ReviewVerdict, GateError> {
    let cleaned = extract_json(response);
    let raw: RawVerdict = serde_json::from_str(cleaned)?;

    let status = VerdictStatus::from_str(&raw.status)
        .map_err(|_| GateError::Llm(format!("unexpected status value: {}", raw.status)))?;

    let issues = raw
        .issues
        .into_iter()
        .map(|issue| Issue {
            line: issue
                .line
                .as_ref()
                .and_then(serde_json::Value::as_u64)
                .and_then(|l| u32::try_from(l).ok()),
            severity: issue
                .severity
                .as_deref()
                .and_then(|s| Severity::from_str(s).ok())
                .unwrap_or(Severity::Info),
            message: issue.message.unwrap_or_else(|| "No description".into()),
        })
        .collect();

    Ok(ReviewVerdict {
        status,
        issues,
        summary: raw.summary,
    })
}
