use std::path::{Path, PathBuf};

use vigil_core::{FileReview, GateError, ReviewVerdict, VerdictStatus};

use crate::collect;
use crate::llm::{ChatMessage, LlmClient, Role};
use crate::prompt;

/// Review orchestrator: one model call per file, strictly sequential.
///
/// Model-call and parse failures never leave this type as errors; they are
/// folded into fail-closed [`ReviewVerdict`]s so an unreviewable file cannot
/// read as approved.
pub struct ReviewPipeline {
    llm: LlmClient,
    max_content_chars: usize,
}

impl ReviewPipeline {
    /// Create a new pipeline from an LLM client and the per-file content budget.
    pub fn new(llm: LlmClient, max_content_chars: usize) -> Self {
        Self {
            llm,
            max_content_chars,
        }
    }

    /// Review each path in order, one completed model call at a time.
    ///
    /// Files that cannot be read are skipped with a logged line and excluded
    /// from the results.
    pub async fn review_files(&self, paths: &[PathBuf]) -> Vec<FileReview> {
        let mut reviews = Vec::with_capacity(paths.len());
        for path in paths {
            let content = match collect::read_capped(path, self.max_content_chars) {
                Ok(content) => content,
                Err(e) => {
                    println!("\u{2717} Error reading {}: {e}", path.display());
                    continue;
                }
            };

            println!("{:=<60}", "");
            println!("Analyzing: {}", path.display());
            println!("{:=<60}", "");

            let verdict = self.analyze_file(path, &content).await;
            match verdict.status {
                VerdictStatus::Approved => println!("\u{2713} {} looks good", path.display()),
                VerdictStatus::NeedsChanges => {
                    println!("\u{2717} Issues found in {}", path.display())
                }
            }
            reviews.push(FileReview {
                path: path.clone(),
                verdict,
            });
        }
        reviews
    }

    /// Send one file to the model and normalize the outcome to a verdict.
    pub async fn analyze_file(&self, path: &Path, content: &str) -> ReviewVerdict {
        println!("Analyzing {} with {} ...", path.display(), self.llm.deployment());

        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: prompt::build_system_prompt(),
            },
            ChatMessage {
                role: Role::User,
                content: prompt::build_review_prompt(path, content),
            },
        ];

        verdict_from_response(self.llm.chat(messages).await)
    }
}

/// Fold a model-call outcome into a verdict.
///
/// This is the fail-closed boundary: a transport/API failure or an
/// unparseable response becomes a NeedsChanges verdict carrying one
/// error-severity issue at line 0, never a process-level error.
///
/// # Examples
///
/// ```
/// use vigil_core::{GateError, VerdictStatus};
/// use vigil_review::pipeline::verdict_from_response;
///
/// let verdict = verdict_from_response(Err(GateError::Llm("connection refused".into())));
/// assert_eq!(verdict.status, VerdictStatus::NeedsChanges);
/// assert_eq!(verdict.issues[0].line, Some(0));
/// ```
pub fn verdict_from_response(result: Result<String, GateError>) -> ReviewVerdict {
    match result {
        Ok(response) => {
            println!("Raw model response: {}...", preview(&response));
            match prompt::parse_verdict(&response) {
                Ok(verdict) => verdict,
                Err(e) => {
                    println!("Failed to parse model response: {e}");
                    ReviewVerdict::failure(
                        "Unable to parse model analysis",
                        format!("model response parsing failed: {e}"),
                    )
                }
            }
        }
        Err(e) => {
            println!("Model call failed: {e}");
            ReviewVerdict::failure(
                "Analysis error occurred",
                format!("model call failed: {e}"),
            )
        }
    }
}

fn preview(s: &str) -> String {
    s.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::Severity;

    #[test]
    fn transport_failure_fails_closed() {
        let verdict =
            verdict_from_response(Err(GateError::Llm("request failed: timeout".into())));
        assert_eq!(verdict.status, VerdictStatus::NeedsChanges);
        assert_eq!(verdict.issues.len(), 1);
        assert_eq!(verdict.issues[0].line, Some(0));
        assert_eq!(verdict.issues[0].severity, Severity::Error);
        assert!(verdict.issues[0].message.contains("model call failed"));
        assert_eq!(verdict.summary, "Analysis error occurred");
    }

    #[test]
    fn unparseable_response_fails_closed() {
        let verdict = verdict_from_response(Ok("I could not produce JSON, sorry.".into()));
        assert_eq!(verdict.status, VerdictStatus::NeedsChanges);
        assert_eq!(verdict.issues.len(), 1);
        assert_eq!(verdict.issues[0].severity, Severity::Error);
        assert!(verdict.issues[0].message.contains("parsing failed"));
        assert_eq!(verdict.summary, "Unable to parse model analysis");
    }

    #[test]
    fn shape_violation_fails_closed() {
        let verdict = verdict_from_response(Ok(r#"{"issues":[],"summary":"no status"}"#.into()));
        assert_eq!(verdict.status, VerdictStatus::NeedsChanges);
        assert_eq!(verdict.issues.len(), 1);
    }

    #[test]
    fn valid_response_passes_through() {
        let verdict = verdict_from_response(Ok(
            r#"{"status":"APPROVED","issues":[],"summary":"Looks fine"}"#.into(),
        ));
        assert!(verdict.status.is_approved());
        assert!(verdict.issues.is_empty());
    }

    #[test]
    fn fenced_response_passes_through() {
        let fenced = "```json\n{\"status\":\"NEEDS_CHANGES\",\"issues\":[{\"line\":5,\"severity\":\"error\",\"message\":\"Unexpected token\"}],\"summary\":\"1 issue\"}\n```";
        let verdict = verdict_from_response(Ok(fenced.into()));
        assert_eq!(verdict.status, VerdictStatus::NeedsChanges);
        assert_eq!(verdict.issues[0].line, Some(5));
    }

    #[test]
    fn preview_is_char_bounded() {
        let long = "\u{00e9}".repeat(500);
        assert_eq!(preview(&long).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }
}
